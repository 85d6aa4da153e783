use bornier_core::{Terminal, TerminalKind};
use bornier_render::{BlockStyle, element_xml, layout_terminal_block};

fn terminal(name: &str, position: u32) -> Terminal {
    Terminal {
        uuid: format!("{{u-{name}}}"),
        block_name: "X1".to_string(),
        name: name.to_string(),
        position,
        xref: format!("1-A{position}"),
        cable: format!("L{position}"),
        kind: TerminalKind::Standard,
        hose: String::new(),
        hose_conductor: String::new(),
        bridge: false,
        reserve_count: 0,
        reserve_positions: String::new(),
        strip_size: 30,
    }
}

fn element() -> bornier_core::XmlNode {
    let style = BlockStyle::default();
    let layout =
        layout_terminal_block("X1", &[terminal("1", 1), terminal("2", 2)], &style).unwrap();
    element_xml(&layout, &style)
}

#[test]
fn element_and_definition_envelope() {
    let element = element();
    assert_eq!(element.name, "element");
    assert_eq!(element.attr("name"), Some("TB_X1.elmt"));

    let definition = element.child("definition").unwrap();
    assert_eq!(definition.attr("width"), Some("100"));
    assert_eq!(definition.attr("height"), Some("460"));
    assert_eq!(definition.attr("hotspot_x"), Some("5"));
    assert_eq!(definition.attr("hotspot_y"), Some("24"));
    assert_eq!(definition.attr("link_type"), Some("simple"));
    assert_eq!(definition.attr("orientation"), Some("dyyy"));
    assert_eq!(definition.attr("version"), Some("0.4"));
    assert_eq!(definition.attr("type"), Some("element"));
}

#[test]
fn definition_carries_uuid_names_label_and_informations() {
    let element = element();
    let definition = element.child("definition").unwrap();

    let uuid = definition.child("uuid").unwrap().attr("uuid").unwrap();
    assert!(uuid.starts_with('{') && uuid.ends_with('}'));

    let names = definition.child("names").unwrap();
    assert_eq!(names.children.len(), 10);
    let langs: Vec<&str> = names
        .children
        .iter()
        .filter_map(|n| n.attr("lang"))
        .collect();
    assert!(langs.contains(&"en") && langs.contains(&"fr") && langs.contains(&"ru"));
    let en = names
        .children
        .iter()
        .find(|n| n.attr("lang") == Some("en"))
        .unwrap();
    assert_eq!(en.text.as_deref(), Some("Terminal block TB_X1"));
    let fr = names
        .children
        .iter()
        .find(|n| n.attr("lang") == Some("fr"))
        .unwrap();
    assert_eq!(fr.text.as_deref(), Some("Bornier TB_X1"));

    let label = definition
        .children_named("dynamic_text")
        .find(|n| n.attr("text_from") == Some("ElementInfo"))
        .unwrap();
    assert_eq!(label.attr("z"), Some("2"));
    assert_eq!(
        label.child("text").and_then(|t| t.text.as_deref()),
        Some("X1")
    );
    assert_eq!(
        label.child("info_name").and_then(|t| t.text.as_deref()),
        Some("label")
    );

    assert_eq!(
        definition
            .child("informations")
            .and_then(|n| n.text.as_deref()),
        Some("Terminal block")
    );
}

#[test]
fn description_maps_every_primitive() {
    let style = BlockStyle::default();
    let layout =
        layout_terminal_block("X1", &[terminal("1", 1), terminal("2", 2)], &style).unwrap();
    let element = element_xml(&layout, &style);
    let description = element.child("definition").unwrap().child("description").unwrap();
    assert_eq!(description.children.len(), layout.primitives.len());

    for child in &description.children {
        assert!(
            matches!(
                child.name.as_str(),
                "rect" | "line" | "circle" | "dynamic_text" | "terminal"
            ),
            "unexpected primitive <{}>",
            child.name
        );
    }
}

#[test]
fn drawing_primitives_carry_qet_attributes() {
    let element = element();
    let description = element.child("definition").unwrap().child("description").unwrap();

    let line = description.children_named("line").next().unwrap();
    assert_eq!(line.attr("length1"), Some("1.5"));
    assert_eq!(line.attr("end1"), Some("none"));
    assert_eq!(line.attr("antialias"), Some("false"));
    assert_eq!(
        line.attr("style"),
        Some("line-style:normal;line-weight:normal;filling:none;color:black")
    );

    let rect = description.children_named("rect").next().unwrap();
    assert_eq!(rect.attr("x"), Some("0"));
    assert_eq!(rect.attr("y"), Some("90"));
    assert_eq!(rect.attr("width"), Some("44"));
    assert_eq!(rect.attr("height"), Some("120"));
}

#[test]
fn labels_are_rotated_user_texts_with_unique_uuids() {
    let element = element();
    let description = element.child("definition").unwrap().child("description").unwrap();

    let mut uuids = Vec::new();
    for label in description
        .children_named("dynamic_text")
        .filter(|n| n.attr("text_from") == Some("UserText"))
    {
        assert_eq!(label.attr("rotation"), Some("270"));
        assert_eq!(label.attr("z"), Some("3"));
        assert_eq!(label.attr("frame"), Some("false"));
        assert!(label.child("text").is_some());
        uuids.push(label.attr("uuid").unwrap().to_string());
    }
    assert!(!uuids.is_empty());
    let unique: std::collections::HashSet<&String> = uuids.iter().collect();
    assert_eq!(unique.len(), uuids.len());

    // The head label keeps its gray color.
    let colored = description
        .children_named("dynamic_text")
        .find(|n| n.child("color").is_some())
        .unwrap();
    assert_eq!(
        colored.child("color").and_then(|c| c.text.as_deref()),
        Some("#777777")
    );
}

#[test]
fn anchors_become_qet_terminals() {
    let element = element();
    let description = element.child("definition").unwrap().child("description").unwrap();

    let orientations: Vec<&str> = description
        .children_named("terminal")
        .filter_map(|n| n.attr("orientation"))
        .collect();
    assert_eq!(orientations, ["n", "s", "n", "s"]);
    let first = description.children_named("terminal").next().unwrap();
    assert_eq!(first.attr("x"), Some("60"));
    assert_eq!(first.attr("y"), Some("0"));
}
