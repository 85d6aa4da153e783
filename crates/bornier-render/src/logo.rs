//! Terminal-kind symbols, centered on the terminal body.

use crate::layout::Sketch;
use crate::style::{BlockStyle, LOGO_HEIGHT};
use bornier_core::TerminalKind;

pub(crate) fn draw(sketch: &mut Sketch, x: f64, y: f64, kind: TerminalKind, style: &BlockStyle) {
    match kind {
        TerminalKind::Ground => ground(sketch, x, y),
        TerminalKind::Fuse => fuse(sketch, x, y, style),
        TerminalKind::Standard => sketch.circle(x - 2.0, y - 2.0, 4.0),
    }
}

/// Stem plus four shrinking bars.
fn ground(sketch: &mut Sketch, x: f64, y: f64) {
    let logo_width = 15.0;
    sketch.line(x, x, y - 10.0, y);

    let x1 = x - logo_width / 2.0;
    let x2 = x + logo_width / 2.0;
    sketch.line(x1, x2, y, y);
    sketch.line(x1 + 2.0, x2 - 2.0, y + 2.0, y + 2.0);
    sketch.line(x1 + 4.0, x2 - 4.0, y + 4.0, y + 4.0);
    sketch.line(x1 + 6.0, x2 - 6.0, y + 6.0, y + 6.0);
}

/// Two rails across the terminal and a central cartridge with a through line.
fn fuse(sketch: &mut Sketch, x: f64, y: f64, style: &BlockStyle) {
    let x1 = x - style.terminal_width / 2.0;
    let x2 = x + style.terminal_width / 2.0;
    let y1 = y - LOGO_HEIGHT / 2.0;
    let y2 = y + LOGO_HEIGHT / 2.0;
    sketch.line(x1, x2, y1, y1);
    sketch.line(x1, x2, y2, y2);

    let x1a = x - 3.0;
    let x2a = x + 3.0;
    let y1a = y1 + 6.0;
    let y2a = y2 - 6.0;
    sketch.line(x1a, x2a, y1a, y1a);
    sketch.line(x1a, x2a, y2a, y2a);
    sketch.line(x1a, x1a, y1a, y2a);
    sketch.line(x2a, x2a, y1a, y2a);
    let mid = x1a + (x2a - x1a) / 2.0;
    sketch.line(mid, mid, y1a - 3.0, y2a + 3.0);
}
