use crate::terminal::{DEFAULT_STRIP_SIZE, Terminal, TerminalKind, TerminalMeta, encode_meta};

#[test]
fn decode_full_tag_soup() {
    let meta = TerminalMeta::decode("%p12%tFUSE%hW3%n2.5mm2%bx%r4%z31,32%s25%");
    assert_eq!(meta.position.as_deref(), Some("12"));
    assert_eq!(meta.kind, TerminalKind::Fuse);
    assert_eq!(meta.hose, "W3");
    assert_eq!(meta.hose_conductor, "2.5mm2");
    assert!(meta.bridged());
    assert_eq!(meta.reserve_count, 4);
    assert_eq!(meta.reserve_positions, "31,32");
    assert_eq!(meta.strip_size, 25);
}

#[test]
fn decode_is_order_independent() {
    let a = TerminalMeta::decode("%p3%tGROUND%hW1%");
    let b = TerminalMeta::decode("%hW1%tGROUND%p3%");
    assert_eq!(a, b);
}

#[test]
fn decode_empty_string_yields_defaults() {
    let meta = TerminalMeta::decode("");
    assert_eq!(meta.position, None);
    assert_eq!(meta.kind, TerminalKind::Standard);
    assert_eq!(meta.hose, "");
    assert_eq!(meta.hose_conductor, "");
    assert!(!meta.bridged());
    assert_eq!(meta.reserve_count, 0);
    assert_eq!(meta.strip_size, DEFAULT_STRIP_SIZE);
}

#[test]
fn decode_empty_kind_tag_is_standard() {
    let meta = TerminalMeta::decode("%p1%t%h%n%b%");
    assert_eq!(meta.kind, TerminalKind::Standard);
}

#[test]
fn decode_kind_is_case_insensitive_and_lenient() {
    assert_eq!(TerminalMeta::decode("%tground%").kind, TerminalKind::Ground);
    assert_eq!(TerminalMeta::decode("%tFuse%").kind, TerminalKind::Fuse);
    assert_eq!(
        TerminalMeta::decode("%tsomething%").kind,
        TerminalKind::Standard
    );
}

#[test]
fn decode_trailing_tag_without_terminator() {
    let meta = TerminalMeta::decode("%p7%hW2");
    assert_eq!(meta.position.as_deref(), Some("7"));
    assert_eq!(meta.hose, "W2");
}

fn terminal() -> Terminal {
    Terminal {
        uuid: "{u}".to_string(),
        block_name: "X1".to_string(),
        name: "4".to_string(),
        position: 4,
        xref: "2-B3".to_string(),
        cable: "L1".to_string(),
        kind: TerminalKind::Ground,
        hose: "W1".to_string(),
        hose_conductor: "1.5".to_string(),
        bridge: true,
        reserve_count: 0,
        reserve_positions: String::new(),
        strip_size: DEFAULT_STRIP_SIZE,
    }
}

#[test]
fn encode_canonical_write_back_format() {
    assert_eq!(encode_meta(&terminal()), "%p4%tGROUND%hW1%n1.5%b1%");

    let mut plain = terminal();
    plain.bridge = false;
    plain.hose.clear();
    plain.hose_conductor.clear();
    plain.kind = TerminalKind::Standard;
    assert_eq!(encode_meta(&plain), "%p4%tSTANDARD%h%n%b%");
}

#[test]
fn terminal_serializes_kind_in_wire_case() {
    let json = serde_json::to_value(terminal()).unwrap();
    assert_eq!(json["kind"], "GROUND");
    assert_eq!(json["bridge"], true);
    assert_eq!(json["position"], 4);
}

#[test]
fn encode_then_decode_round_trips_rewritten_fields() {
    let t = terminal();
    let meta = TerminalMeta::decode(&encode_meta(&t));
    assert_eq!(meta.position.as_deref(), Some("4"));
    assert_eq!(meta.kind, t.kind);
    assert_eq!(meta.hose, t.hose);
    assert_eq!(meta.hose_conductor, t.hose_conductor);
    assert_eq!(meta.bridged(), t.bridge);
}
