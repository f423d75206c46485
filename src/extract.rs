//! Pulls time-windowed spot blocks out of the formatted advertising sheet.

use crate::config::{ColumnMap, TimeWindow};
use crate::grid::{last_used_row, CellSnapshot};
use crate::timecode::parse_cell_time;
use log::debug;
use umya_spreadsheet::Worksheet;

/// One payload row of an interval block: the spot ID plus the three
/// companion columns, each captured as value + style so either splice
/// variant (copy or re-stamp) can be served.
#[derive(Debug, Clone)]
pub struct SpotRecord {
    pub spot_id: CellSnapshot,
    pub duration: CellSnapshot,
    pub payload: CellSnapshot,
    pub block_mark: CellSnapshot,
}

/// Collects the first contiguous run of rows whose time column falls
/// inside `window`, keeping rows with a non-empty payload column.
///
/// Rows with an unparseable time inside the run are treated as still
/// in-window; the run ends at the first row whose time parses and falls
/// outside. Only the first matching run per window is used — later runs
/// in the same window are deliberately ignored.
pub fn extract_block(sheet: &Worksheet, window: &TimeWindow, map: &ColumnMap) -> Vec<SpotRecord> {
    let last_row = last_used_row(sheet, map.time);
    let mut records = Vec::new();

    let mut run_start = None;
    for row in 1..=last_row {
        match parse_cell_time(sheet, map.time, row) {
            Some(seconds) if window.contains(seconds) => {
                run_start = Some(row);
                break;
            }
            _ => {}
        }
    }
    let Some(run_start) = run_start else {
        return records;
    };

    let mut run_end = run_start;
    for row in run_start..=last_row {
        if let Some(seconds) = parse_cell_time(sheet, map.time, row) {
            if !window.contains(seconds) {
                break;
            }
        }
        run_end = row;

        let payload = CellSnapshot::capture(sheet, map.position, row);
        if payload.is_empty() {
            continue;
        }
        records.push(SpotRecord {
            spot_id: CellSnapshot::capture(sheet, map.spot_id, row),
            duration: CellSnapshot::capture(sheet, map.duration, row),
            payload,
            block_mark: CellSnapshot::capture(sheet, map.block_mark, row),
        });
    }

    if !records.is_empty() {
        debug!(
            "window {}-{}: collected {} spot rows from rows {run_start}-{run_end}",
            window.start,
            window.end,
            records.len()
        );
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(start: &str, end: &str) -> TimeWindow {
        TimeWindow {
            start: crate::timecode::parse_time_str(start).unwrap(),
            end: crate::timecode::parse_time_str(end).unwrap(),
            tags: vec!["06_30".to_string()],
        }
    }

    fn pub_sheet(rows: &[(&str, &str)]) -> umya_spreadsheet::Spreadsheet {
        let mut book = umya_spreadsheet::new_file();
        let sheet = book.get_sheet_mut(&0).unwrap();
        for (i, (time, payload)) in rows.iter().enumerate() {
            let row = i as u32 + 1;
            if !time.is_empty() {
                sheet.get_cell_mut((3, row)).set_value(*time);
            }
            if !payload.is_empty() {
                sheet.get_cell_mut((10, row)).set_value(*payload);
                sheet.get_cell_mut((7, row)).set_value(format!("spot {row}"));
            }
        }
        book
    }

    #[test]
    fn test_collects_first_in_window_run() {
        let book = pub_sheet(&[
            ("05:50:00", "_1_"),
            ("06:05:00", "_1_"),
            ("06:10:00", ""),
            ("06:20:00", "_2_"),
            ("06:45:00", "_3_"),
        ]);
        let sheet = book.get_sheet(&0).unwrap();
        let block = extract_block(sheet, &window("06:00:00", "06:30:00"), &ColumnMap::default());

        assert_eq!(block.len(), 2);
        assert_eq!(block[0].payload.text, "_1_");
        assert_eq!(block[0].spot_id.text, "spot 2");
        assert_eq!(block[1].payload.text, "_2_");
    }

    #[test]
    fn test_unparseable_times_stay_in_run() {
        let book = pub_sheet(&[
            ("06:05:00", "_1_"),
            ("n/a", "_2_"),
            ("06:20:00", "_3_"),
            ("07:10:00", "_4_"),
        ]);
        let sheet = book.get_sheet(&0).unwrap();
        let block = extract_block(sheet, &window("06:00:00", "06:30:00"), &ColumnMap::default());

        let payloads: Vec<&str> = block.iter().map(|r| r.payload.text.as_str()).collect();
        assert_eq!(payloads, vec!["_1_", "_2_", "_3_"]);
    }

    #[test]
    fn test_only_first_run_is_used() {
        let book = pub_sheet(&[
            ("06:05:00", "_1_"),
            ("08:00:00", "_x_"),
            ("06:10:00", "_2_"),
        ]);
        let sheet = book.get_sheet(&0).unwrap();
        let block = extract_block(sheet, &window("06:00:00", "06:30:00"), &ColumnMap::default());

        assert_eq!(block.len(), 1);
        assert_eq!(block[0].payload.text, "_1_");
    }

    #[test]
    fn test_no_match_yields_empty_block() {
        let book = pub_sheet(&[("09:00:00", "_1_")]);
        let sheet = book.get_sheet(&0).unwrap();
        let block = extract_block(sheet, &window("06:00:00", "06:30:00"), &ColumnMap::default());
        assert!(block.is_empty());
    }
}
