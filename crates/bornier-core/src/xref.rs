//! Cross-reference labels: grid coordinates to `page-rowcolumn` strings.
//!
//! QET diagrams carry a folio-reference format string (e.g. `%f-%l%c`) in the
//! project's `newdiagrams/report` node; the `%` tags are substituted from the
//! diagram attributes and the element's grid cell.

/// Fixed pixel offset of the drawing area relative to the page border
/// (row-letter band and column band).
pub const GRID_ORIGIN_OFFSET: i64 = 25;

/// Default folio-reference format when the project does not configure one.
pub const DEFAULT_XREF_FORMAT: &str = "%f-%l%c";

/// Grid geometry of one diagram page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagramGrid {
    pub rows: u32,
    pub row_size: u32,
    pub cols: u32,
    pub col_size: u32,
}

impl DiagramGrid {
    /// Maps absolute page coordinates to `(row letter, 1-based column)`.
    ///
    /// Coordinates outside the drawing area clamp to the border cells.
    pub fn cell(&self, x: i64, y: i64) -> (char, u32) {
        let row_size = self.row_size.max(1) as i64;
        let col_size = self.col_size.max(1) as i64;

        let row_index = (y - GRID_ORIGIN_OFFSET).div_euclid(row_size);
        let row_index = row_index.clamp(0, self.rows.max(1) as i64 - 1);
        let row_letter = (b'A' + row_index as u8) as char;

        let column = (x - GRID_ORIGIN_OFFSET).div_euclid(col_size) + 1;
        let column = column.clamp(1, self.cols.max(1) as i64) as u32;

        tracing::debug!(
            cols = self.cols,
            col_size = self.col_size,
            row_size = self.row_size,
            x,
            y,
            "xref cell"
        );
        (row_letter, column)
    }
}

/// Substitution context for one diagram page.
#[derive(Debug, Clone, Copy, Default)]
pub struct XrefContext<'a> {
    /// Folio number including the page offset.
    pub page: u32,
    pub total_pages: u32,
    /// The diagram's `folio` label (may itself contain `%id`/`%total`/`%autonum`).
    pub folio: &'a str,
    pub machine: &'a str,
    pub locmach: &'a str,
}

/// Expands a folio-reference format string for one grid cell.
pub fn format_xref(format: &str, ctx: &XrefContext<'_>, row_letter: char, column: u32) -> String {
    let page = ctx.page.to_string();
    let mut out = format.to_string();

    if out.contains("%f") {
        out = out.replace("%f", &page);
    }
    if out.contains("%F") {
        // %F pulls in the folio label, which can carry its own tags.
        let mut folio = ctx.folio.to_string();
        if folio.contains("%id") {
            folio = folio.replace("%id", &page);
        }
        if folio.contains("%total") {
            folio = folio.replace("%total", &ctx.total_pages.to_string());
        }
        if folio.contains("%autonum") {
            folio = folio.replace("%autonum", &page);
        }
        out = out.replace("%F", &folio);
    }
    if out.contains("%LM") {
        out = out.replace("%LM", ctx.locmach);
    }
    if out.contains("%M") {
        out = out.replace("%M", ctx.machine);
    }
    if out.contains("%l") {
        out = out.replace("%l", &row_letter.to_string());
    }
    if out.contains("%c") {
        out = out.replace("%c", &column.to_string());
    }
    out
}
