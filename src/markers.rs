//! Locating `PLAYLIST_IN_*` / `PLAYLIST_OUT_*` marker pairs and editing
//! the row regions they bound.
//!
//! Structural mutation shifts every row index below the edit point, so
//! callers re-query positions after each call; nothing here caches rows.

use crate::error::{Result, ScheduleError};
use crate::grid::{cell_text, last_used_row};
use log::debug;
use umya_spreadsheet::Worksheet;

pub const MARKER_IN_PREFIX: &str = "PLAYLIST_IN_";
pub const MARKER_OUT_PREFIX: &str = "PLAYLIST_OUT_";

pub fn marker_in(tag: &str) -> String {
    format!("{MARKER_IN_PREFIX}{tag}")
}

pub fn marker_out(tag: &str) -> String {
    format!("{MARKER_OUT_PREFIX}{tag}")
}

/// Finds the marker pair for `tag` in the given column.
///
/// Returns `Ok(None)` when the IN marker is absent (the tag simply is not
/// on this sheet). An IN marker without a later matching OUT violates the
/// pairing invariant and is an error, not a silent miss.
pub fn find_pair(sheet: &Worksheet, col: u32, tag: &str) -> Result<Option<(u32, u32)>> {
    let needle_in = marker_in(tag);
    let needle_out = marker_out(tag);
    let last_row = last_used_row(sheet, col);

    let mut start_row = 0;
    for row in 1..=last_row {
        let text = cell_text(sheet, col, row);
        if text == needle_in {
            start_row = row;
        } else if text == needle_out {
            if start_row == 0 {
                return Err(ScheduleError::StructuralMismatch(format!(
                    "{needle_out} at row {row} precedes {needle_in}"
                )));
            }
            return Ok(Some((start_row, row)));
        }
    }

    if start_row > 0 {
        return Err(ScheduleError::StructuralMismatch(format!(
            "{needle_in} at row {start_row} has no matching {needle_out}"
        )));
    }
    Ok(None)
}

/// Deletes every row strictly between a marker pair, leaving the two
/// markers adjacent. Returns the number of rows removed.
pub fn delete_interior(sheet: &mut Worksheet, start_row: u32, end_row: u32) -> u32 {
    if end_row <= start_row + 1 {
        return 0;
    }
    let count = end_row - start_row - 1;
    sheet.remove_row(&(start_row + 1), &count);
    count
}

/// Opens `count` blank rows at `at_row`, shifting rows at and below it
/// downward.
pub fn insert_rows(sheet: &mut Worksheet, at_row: u32, count: u32) {
    if count > 0 {
        sheet.insert_new_row(&at_row, &count);
    }
}

/// Clears the interior of every marker region in the column, top to
/// bottom, re-scanning after each structural edit. Any `PLAYLIST_IN_*`
/// without a following `PLAYLIST_OUT_*` fails the whole pass.
pub fn clear_marker_regions(sheet: &mut Worksheet, col: u32) -> Result<()> {
    let mut row = 1;
    loop {
        let last_row = last_used_row(sheet, col);
        if row > last_row {
            return Ok(());
        }

        let text = cell_text(sheet, col, row);
        if text.starts_with(MARKER_IN_PREFIX) {
            let mut end_row = 0;
            for candidate in (row + 1)..=last_row {
                if cell_text(sheet, col, candidate).starts_with(MARKER_OUT_PREFIX) {
                    end_row = candidate;
                    break;
                }
            }
            if end_row == 0 {
                return Err(ScheduleError::StructuralMismatch(format!(
                    "{text} at row {row} has no matching PLAYLIST_OUT_ marker"
                )));
            }
            let removed = delete_interior(sheet, row, end_row);
            if removed > 0 {
                debug!("cleared {removed} rows inside {text}");
            }
            // The OUT marker is now at row + 1; resume past it.
            row += 2;
        } else {
            row += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marker_sheet(values: &[(u32, &str)]) -> umya_spreadsheet::Spreadsheet {
        let mut book = umya_spreadsheet::new_file();
        let sheet = book.get_sheet_mut(&0).unwrap();
        for (row, value) in values {
            sheet.get_cell_mut((6, *row)).set_value(*value);
        }
        book
    }

    #[test]
    fn test_find_pair() {
        let book = marker_sheet(&[
            (2, "PLAYLIST_IN_06_30"),
            (5, "PLAYLIST_OUT_06_30"),
            (7, "PLAYLIST_IN_07_20"),
            (8, "PLAYLIST_OUT_07_20"),
        ]);
        let sheet = book.get_sheet(&0).unwrap();
        assert_eq!(find_pair(sheet, 6, "06_30").unwrap(), Some((2, 5)));
        assert_eq!(find_pair(sheet, 6, "07_20").unwrap(), Some((7, 8)));
        assert_eq!(find_pair(sheet, 6, "09_10").unwrap(), None);
    }

    #[test]
    fn test_unpaired_in_marker_is_structural_mismatch() {
        let book = marker_sheet(&[(2, "PLAYLIST_IN_06_30")]);
        let sheet = book.get_sheet(&0).unwrap();
        let err = find_pair(sheet, 6, "06_30").unwrap_err();
        assert!(matches!(err, ScheduleError::StructuralMismatch(_)));
    }

    #[test]
    fn test_out_before_in_is_structural_mismatch() {
        let book = marker_sheet(&[(2, "PLAYLIST_OUT_06_30"), (4, "PLAYLIST_IN_06_30")]);
        let sheet = book.get_sheet(&0).unwrap();
        assert!(find_pair(sheet, 6, "06_30").is_err());
    }

    #[test]
    fn test_delete_interior_makes_pair_adjacent() {
        let mut book = marker_sheet(&[
            (2, "PLAYLIST_IN_06_30"),
            (3, "old spot"),
            (4, "old spot"),
            (5, "PLAYLIST_OUT_06_30"),
        ]);
        let sheet = book.get_sheet_mut(&0).unwrap();
        let removed = delete_interior(sheet, 2, 5);
        assert_eq!(removed, 2);

        let sheet = book.get_sheet(&0).unwrap();
        assert_eq!(find_pair(sheet, 6, "06_30").unwrap(), Some((2, 3)));
    }

    #[test]
    fn test_clear_marker_regions_handles_multiple_pairs() {
        let mut book = marker_sheet(&[
            (1, "intro"),
            (2, "PLAYLIST_IN_06_30"),
            (3, "stale"),
            (4, "PLAYLIST_OUT_06_30"),
            (6, "PLAYLIST_IN_07_20"),
            (7, "stale"),
            (8, "stale"),
            (9, "stale"),
            (10, "PLAYLIST_OUT_07_20"),
            (11, "outro"),
        ]);
        let sheet = book.get_sheet_mut(&0).unwrap();
        clear_marker_regions(sheet, 6).unwrap();

        let sheet = book.get_sheet(&0).unwrap();
        assert_eq!(find_pair(sheet, 6, "06_30").unwrap(), Some((2, 3)));
        assert_eq!(find_pair(sheet, 6, "07_20").unwrap(), Some((5, 6)));
        assert_eq!(cell_text(sheet, 6, 7), "outro");
    }

    #[test]
    fn test_clear_marker_regions_rejects_unpaired_in() {
        let mut book = marker_sheet(&[(2, "PLAYLIST_IN_06_30"), (3, "stale")]);
        let sheet = book.get_sheet_mut(&0).unwrap();
        assert!(clear_marker_regions(sheet, 6).is_err());
    }
}
