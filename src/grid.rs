//! Thin addressing layer over a worksheet: trimmed text reads,
//! per-column last-used-row queries, and atomic value+style snapshots.

use umya_spreadsheet::{Style, Worksheet};

/// Returns the trimmed text of a cell; blank and whitespace-only cells
/// read as the empty string.
pub fn cell_text(sheet: &Worksheet, col: u32, row: u32) -> String {
    sheet.get_value((col, row)).trim().to_string()
}

pub fn is_blank(sheet: &Worksheet, col: u32, row: u32) -> bool {
    cell_text(sheet, col, row).is_empty()
}

/// Highest row with a non-blank value in the given column; 1 when the
/// column is entirely blank.
pub fn last_used_row(sheet: &Worksheet, col: u32) -> u32 {
    let mut last = sheet.get_highest_row();
    while last > 0 {
        if !is_blank(sheet, col, last) {
            return last;
        }
        last -= 1;
    }
    1
}

/// A cell's value and style captured together. Copying a cell means
/// copying both; the style is an owned clone, never a shared reference.
#[derive(Debug, Clone)]
pub struct CellSnapshot {
    pub text: String,
    pub style: Style,
}

impl CellSnapshot {
    pub fn capture(sheet: &Worksheet, col: u32, row: u32) -> Self {
        let text = cell_text(sheet, col, row);
        let style = sheet
            .get_cell((col, row))
            .map(|cell| cell.get_style().clone())
            .unwrap_or_default();
        Self { text, style }
    }

    /// Writes value and style back atomically.
    pub fn write(&self, sheet: &mut Worksheet, col: u32, row: u32) {
        let cell = sheet.get_cell_mut((col, row));
        cell.set_value(self.text.clone());
        cell.set_style(self.style.clone());
    }

    /// Writes the value but stamps the given style instead of the
    /// captured one (fixed-template splice variant).
    pub fn write_with_style(&self, sheet: &mut Worksheet, col: u32, row: u32, style: Style) {
        let cell = sheet.get_cell_mut((col, row));
        cell.set_value(self.text.clone());
        cell.set_style(style);
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}
