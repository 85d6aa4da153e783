//! Deterministic terminal-block geometry.
//!
//! The layout is a flat list of drawing primitives with the coordinate origin
//! at the upper-left corner of the block. It depends only on the block name,
//! the terminal records (in slice order) and the [`BlockStyle`].

use crate::style::{BlockStyle, X_OFFSET_CABLE_TEXT, Y_OFFSET_BASE_TEXT};
use crate::{Error, Result, logo};
use bornier_core::Terminal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    #[serde(rename = "n")]
    North,
    #[serde(rename = "s")]
    South,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Primitive {
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
    },
    Circle {
        x: f64,
        y: f64,
        diameter: f64,
    },
    Label {
        x: f64,
        y: f64,
        font_size: f64,
        text: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        color: Option<String>,
    },
    /// A QET connection hotspot at one end of a conductor.
    Anchor {
        x: f64,
        y: f64,
        orientation: Orientation,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerminalBlockLayout {
    pub name: String,
    pub width: f64,
    pub height: f64,
    pub primitives: Vec<Primitive>,
}

/// `+1`, then up to the next multiple of ten.
fn round_up_to_tens(v: f64) -> f64 {
    let mut w = v.ceil() as i64 + 1;
    while w % 10 != 0 {
        w += 1;
    }
    w as f64
}

pub(crate) struct Sketch {
    primitives: Vec<Primitive>,
}

impl Sketch {
    pub(crate) fn rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.primitives.push(Primitive::Rect {
            x,
            y,
            width,
            height,
        });
    }

    pub(crate) fn line(&mut self, x1: f64, x2: f64, y1: f64, y2: f64) {
        self.primitives.push(Primitive::Line { x1, y1, x2, y2 });
    }

    pub(crate) fn circle(&mut self, x: f64, y: f64, diameter: f64) {
        self.primitives.push(Primitive::Circle { x, y, diameter });
    }

    fn anchor(&mut self, x: f64, y: f64, orientation: Orientation) {
        self.primitives.push(Primitive::Anchor { x, y, orientation });
    }

    /// Rotated conductor label; the anchor point shifts left by the font size.
    fn label_cond(&mut self, x: f64, y: f64, font_size: f64, text: &str) {
        self.primitives.push(Primitive::Label {
            x: x - font_size + 1.0,
            y,
            font_size,
            text: text.to_string(),
            color: None,
        });
    }

    fn label(&mut self, x: f64, y: f64, font_size: f64, text: &str, color: Option<&str>) {
        self.primitives.push(Primitive::Label {
            x,
            y,
            font_size,
            text: text.to_string(),
            color: color.map(str::to_string),
        });
    }
}

fn text_len(text: &str) -> f64 {
    text.chars().count() as f64
}

pub fn layout_terminal_block(
    name: &str,
    terminals: &[Terminal],
    style: &BlockStyle,
) -> Result<TerminalBlockLayout> {
    if terminals.is_empty() {
        return Err(Error::EmptyBlock {
            name: name.to_string(),
        });
    }

    let n = terminals.len();
    let width = round_up_to_tens(
        style.head_width + style.union_width + n as f64 * style.terminal_width,
    );
    let height = round_up_to_tens(
        style.conductor_length
            + style.terminal_height
            + style.hose_conductor_start
            + style.hose_length
            + style.hose_conductor_end,
    );

    let mut sketch = Sketch {
        primitives: Vec::new(),
    };
    let mut cursor = 0.0_f64;

    // Geometric y coord of the terminal centers.
    let y_term_center = style.conductor_length + style.terminal_height / 2.0;

    // Head with the rotated block name.
    sketch.rect(
        cursor,
        y_term_center - style.head_height / 2.0,
        style.head_width,
        style.head_height,
    );
    sketch.label(
        style.head_width / 2.0 - style.head_font,
        y_term_center + text_len(name) / 2.0 * style.head_font,
        style.head_font,
        name,
        Some("#777777"),
    );

    // Union between head and the first terminal.
    cursor += style.head_width;
    sketch.rect(
        cursor,
        y_term_center - style.union_height / 2.0,
        style.union_width,
        style.union_height,
    );

    cursor += style.union_width;
    let mut last_hose = "";
    let mut last_cable_coord_x = cursor;
    // Bottom labels grow upward (the text runs north); pad them all by the
    // longest cable name so the columns align.
    let max_cable_len = terminals
        .iter()
        .map(|t| text_len(&t.cable))
        .fold(0.0, f64::max);

    for (i, terminal) in terminals.iter().enumerate() {
        let x_term_center = cursor + style.terminal_width / 2.0;

        sketch.rect(
            cursor,
            y_term_center - style.terminal_height / 2.0,
            style.terminal_width,
            style.terminal_height,
        );
        // Terminal number, above the lower edge.
        let term_label_y = y_term_center + style.terminal_height / 2.0 - Y_OFFSET_BASE_TEXT;
        sketch.label(
            (x_term_center - style.terminal_font) + style.head_width / 2.0
                - style.terminal_width
                - style.terminal_font
                + 6.0,
            term_label_y + term_label_y * 0.10,
            style.terminal_font,
            &terminal.name,
            Some("#555555"),
        );
        // Cross-reference, above the terminal center.
        let xref_label_y = y_term_center - Y_OFFSET_BASE_TEXT;
        sketch.label(
            (x_term_center - style.terminal_font) + style.head_width / 2.0
                - style.terminal_width
                - style.xref_font
                + 5.0,
            xref_label_y - xref_label_y * 0.10,
            style.xref_font,
            &terminal.xref,
            None,
        );

        logo::draw(&mut sketch, x_term_center, y_term_center, terminal.kind, style);

        if terminal.bridge {
            sketch.line(
                x_term_center,
                x_term_center + style.terminal_width,
                y_term_center,
                y_term_center,
            );
        }

        // North conductor.
        sketch.line(x_term_center, x_term_center, 0.0, style.conductor_length);
        sketch.label_cond(
            x_term_center - style.conductor_font - X_OFFSET_CABLE_TEXT,
            style.conductor_length - Y_OFFSET_BASE_TEXT + 3.0,
            style.conductor_font,
            &terminal.cable,
        );
        sketch.anchor(cursor + style.terminal_width / 2.0, 0.0, Orientation::North);

        let south_top = style.conductor_length + style.terminal_height;
        if !terminal.hose.is_empty() {
            // Hose conductor, start segment.
            sketch.line(
                x_term_center,
                x_term_center,
                south_top,
                south_top + style.hose_conductor_start,
            );
            sketch.label_cond(
                x_term_center - style.conductor_font - X_OFFSET_CABLE_TEXT,
                south_top + Y_OFFSET_BASE_TEXT + max_cable_len * style.conductor_font,
                style.conductor_font,
                &terminal.cable,
            );
            sketch.label_cond(
                x_term_center - style.conductor_font - X_OFFSET_CABLE_TEXT,
                south_top + style.hose_conductor_start,
                style.conductor_font,
                &terminal.hose_conductor,
            );
            let tick_y = south_top + style.hose_conductor_start - 10.0;
            sketch.line(
                cursor + style.terminal_width / 2.0 - 2.0,
                cursor + style.terminal_width / 2.0 + 2.0,
                tick_y - 2.0,
                tick_y + 2.0,
            );

            // Hose conductor, end segment.
            let end_y1 = south_top + style.hose_conductor_start + style.hose_length;
            let end_y2 = end_y1 + style.hose_conductor_end;
            sketch.line(x_term_center, x_term_center, end_y1, end_y2);
            let end_label_y =
                end_y1 + Y_OFFSET_BASE_TEXT + max_cable_len * style.conductor_font;
            sketch.label_cond(
                x_term_center - style.conductor_font - X_OFFSET_CABLE_TEXT,
                end_label_y,
                style.conductor_font,
                &terminal.hose_conductor,
            );
            sketch.line(
                cursor + style.terminal_width / 2.0 - 2.0,
                cursor + style.terminal_width / 2.0 + 2.0,
                end_label_y - 10.0 - 2.0,
                end_label_y - 10.0 + 2.0,
            );
            sketch.anchor(
                cursor + style.terminal_width / 2.0,
                end_y2,
                Orientation::South,
            );
        } else {
            // Independent conductor, no hose.
            sketch.line(
                x_term_center,
                x_term_center,
                south_top,
                south_top + style.conductor_length,
            );
            sketch.label_cond(
                x_term_center - style.conductor_font - 3.0,
                south_top + Y_OFFSET_BASE_TEXT + max_cable_len * style.conductor_font,
                style.conductor_font,
                &terminal.cable,
            );
            sketch.anchor(
                cursor + style.terminal_width / 2.0,
                2.0 * style.conductor_length + style.terminal_height,
                Orientation::South,
            );
        }

        // Hose brackets, drawn when a hose group ends (hose change or last
        // terminal).
        let bracket_y1 = south_top + style.hose_conductor_start;
        let bracket_y2 = bracket_y1 + style.hose_length;
        let hose = terminal.hose.as_str();
        let is_last = i == n - 1;
        if (hose != last_hose && !last_hose.is_empty()) || (!last_hose.is_empty() && is_last) {
            let x1 = last_cable_coord_x + style.terminal_width / 2.0;
            let mut x2 = cursor - style.terminal_width / 2.0;
            if is_last && hose == last_hose {
                x2 += style.terminal_width;
            }
            sketch.line(x1, x2, bracket_y1, bracket_y1);
            sketch.line(x1, x2, bracket_y2, bracket_y2);
            sketch.line(
                (x1 + x2) / 2.0,
                (x1 + x2) / 2.0,
                bracket_y1,
                bracket_y2,
            );
            sketch.label_cond(
                (x1 + x2) / 2.0 - style.terminal_width + 10.0,
                bracket_y1 + (bracket_y2 - bracket_y1) / 2.0 + text_len(last_hose) * 3.0,
                style.conductor_font,
                last_hose,
            );

            // A new single-conductor hose right at the end gets its own drop.
            if is_last && hose != last_hose && !hose.is_empty() {
                let x2 = x2 + style.terminal_width;
                sketch.line(x2, x2, bracket_y1, bracket_y2);
                sketch.label_cond(
                    x2 - 10.0,
                    bracket_y1 + (bracket_y2 - bracket_y1) / 2.0 + text_len(last_hose) * 3.0,
                    style.conductor_font,
                    hose,
                );
            }
        }

        if hose != last_hose {
            last_cable_coord_x = cursor;
        }

        cursor += style.terminal_width;
        last_hose = hose;
    }

    Ok(TerminalBlockLayout {
        name: name.to_string(),
        width,
        height,
        primitives: sketch.primitives,
    })
}
