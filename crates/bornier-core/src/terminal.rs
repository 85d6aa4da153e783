//! Terminal records and the packed `%`-tag metadata codec.
//!
//! The plugin state of a terminal element travels inside the element's
//! `elementInformation[name="function"]` text as a run of `%`-prefixed tags,
//! e.g. `%p2%tGROUND%hW3%n1.5mm2%b1%`.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// Default terminal strip size when `%s` is absent.
pub const DEFAULT_STRIP_SIZE: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TerminalKind {
    #[default]
    Standard,
    Ground,
    Fuse,
}

impl FromStr for TerminalKind {
    type Err = ();

    /// Case-insensitive; anything unrecognized is a standard terminal.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "ground" => Self::Ground,
            "fuse" => Self::Fuse,
            _ => Self::Standard,
        })
    }
}

impl fmt::Display for TerminalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Standard => "STANDARD",
            Self::Ground => "GROUND",
            Self::Fuse => "FUSE",
        };
        f.write_str(s)
    }
}

/// One extracted terminal, keyed by the element uuid in the project file.
///
/// `position` is the canonical 1-based slot within its block after
/// sorting/renumbering; `hose` groups terminals that leave the block inside
/// the same multi-conductor cable, `hose_conductor` names the single wire
/// within that cable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Terminal {
    pub uuid: String,
    pub block_name: String,
    pub name: String,
    pub position: u32,
    pub xref: String,
    pub cable: String,
    pub kind: TerminalKind,
    pub hose: String,
    pub hose_conductor: String,
    pub bridge: bool,
    pub reserve_count: u32,
    pub reserve_positions: String,
    pub strip_size: u32,
}

impl Terminal {
    /// A synthetic reserve terminal filling a numbering gap.
    pub fn reserve(block_name: &str, name: impl Into<String>, label: &str) -> Self {
        Self {
            uuid: String::new(),
            block_name: block_name.to_string(),
            name: name.into(),
            position: 0,
            xref: String::new(),
            cable: label.to_string(),
            kind: TerminalKind::Standard,
            hose: String::new(),
            hose_conductor: String::new(),
            bridge: false,
            reserve_count: 0,
            reserve_positions: String::new(),
            strip_size: DEFAULT_STRIP_SIZE,
        }
    }
}

/// Decoded form of the packed metadata string.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TerminalMeta {
    /// Raw `%p` digits; `None` falls back to the terminal name.
    pub position: Option<String>,
    pub kind: TerminalKind,
    pub hose: String,
    pub hose_conductor: String,
    /// Raw `%b` payload; any non-empty value means "bridged".
    pub bridge: String,
    pub reserve_count: u32,
    pub reserve_positions: String,
    pub strip_size: u32,
}

macro_rules! tag_regex {
    ($name:ident, $pattern:expr) => {
        fn $name() -> &'static Regex {
            static ONCE: OnceLock<Regex> = OnceLock::new();
            ONCE.get_or_init(|| Regex::new($pattern).unwrap())
        }
    };
}

tag_regex!(re_pos, r"%p(\d+)(%|$)");
tag_regex!(re_kind, r"%t([^%]*)(%|$)");
tag_regex!(re_hose, r"%h([^%]*)(%|$)");
tag_regex!(re_conductor, r"%n([^%]*)(%|$)");
tag_regex!(re_bridge, r"%b([^%]*)(%|$)");
tag_regex!(re_reserve, r"%r(\d+)(%|$)");
tag_regex!(re_reserve_pos, r"%z([^%]*)(%|$)");
tag_regex!(re_size, r"%s(\d+)(%|$)");

fn capture<'a>(re: &Regex, meta: &'a str) -> Option<&'a str> {
    re.captures(meta)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

impl TerminalMeta {
    /// Decodes a packed metadata string; every tag is optional and order does
    /// not matter. An empty input yields all defaults.
    pub fn decode(meta: &str) -> Self {
        let kind = capture(re_kind(), meta)
            .filter(|s| !s.is_empty())
            .map(|s| s.parse().unwrap_or_default())
            .unwrap_or_default();
        Self {
            position: capture(re_pos(), meta).map(str::to_string),
            kind,
            hose: capture(re_hose(), meta).unwrap_or_default().to_string(),
            hose_conductor: capture(re_conductor(), meta)
                .unwrap_or_default()
                .to_string(),
            bridge: capture(re_bridge(), meta).unwrap_or_default().to_string(),
            reserve_count: capture(re_reserve(), meta)
                .and_then(|s| s.parse().ok())
                .unwrap_or(0),
            reserve_positions: capture(re_reserve_pos(), meta)
                .unwrap_or_default()
                .to_string(),
            strip_size: capture(re_size(), meta)
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_STRIP_SIZE),
        }
    }

    pub fn bridged(&self) -> bool {
        !self.bridge.is_empty()
    }
}

/// Canonical write-back format for a terminal's packed metadata.
///
/// Only the per-terminal fields are rewritten; `%r`/`%z`/`%s` are block-wide
/// settings that the write path leaves to their owners.
pub fn encode_meta(terminal: &Terminal) -> String {
    format!(
        "%p{}%t{}%h{}%n{}%b{}%",
        terminal.position,
        terminal.kind,
        terminal.hose,
        terminal.hose_conductor,
        if terminal.bridge { "1" } else { "" },
    )
}
