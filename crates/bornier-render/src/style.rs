//! Dimension and font settings for generated terminal blocks.

use serde::{Deserialize, Serialize};

/// Height of the fuse symbol.
pub const LOGO_HEIGHT: f64 = 36.0;
/// Vertical offset between a terminal edge and its rotated labels.
pub const Y_OFFSET_BASE_TEXT: f64 = 22.0;
/// Horizontal offset between a conductor line and its label.
pub const X_OFFSET_CABLE_TEXT: f64 = 4.0;

/// All block dimensions in QET pixels; loadable from JSON with every field
/// optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockStyle {
    pub head_height: f64,
    pub head_width: f64,
    pub union_height: f64,
    pub union_width: f64,
    pub terminal_height: f64,
    pub terminal_width: f64,
    /// Length of the north conductor (and of a south conductor outside a hose).
    pub conductor_length: f64,
    pub hose_conductor_start: f64,
    pub hose_length: f64,
    pub hose_conductor_end: f64,
    pub head_font: f64,
    pub terminal_font: f64,
    pub xref_font: f64,
    pub conductor_font: f64,
    /// Terminals per generated block before a strip is split.
    pub split_size: u32,
    /// Cable text used for synthesized reserve terminals.
    pub reservation_label: String,
}

impl Default for BlockStyle {
    fn default() -> Self {
        Self {
            head_height: 120.0,
            head_width: 44.0,
            union_height: 70.0,
            union_width: 6.0,
            terminal_height: 160.0,
            terminal_width: 20.0,
            conductor_length: 70.0,
            hose_conductor_start: 70.0,
            hose_length: 80.0,
            hose_conductor_end: 70.0,
            head_font: 13.0,
            terminal_font: 9.0,
            xref_font: 6.0,
            conductor_font: 6.0,
            split_size: 30,
            reservation_label: String::new(),
        }
    }
}

impl BlockStyle {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}
