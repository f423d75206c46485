//! Derives the auxiliary `constant` sheet from the primary schedule:
//! a re-projection of the named columns plus a canonical time column,
//! synthetic ad-break test markers inside playlist regions, and a
//! de-duplicated event-note annotation.

use crate::classify::{is_status_noise, StatusCode};
use crate::config::{ColumnMap, TimeSource};
use crate::error::{Result, ScheduleError};
use crate::grid::{cell_text, last_used_row};
use crate::markers::{MARKER_IN_PREFIX, MARKER_OUT_PREFIX};
use crate::style::font_12_bold;
use crate::timecode::{format_time, parse_cell_time, parse_time_str};
use log::debug;
use umya_spreadsheet::{Spreadsheet, Worksheet};

pub const CONSTANT_SHEET: &str = "constant";
pub const SYNTHETIC_MARKER: &str = "ID CUB_PUB_TEST";

/// Destination columns inside the constant sheet.
const DEST_TIME: u32 = 1;
const DEST_CATEGORY: u32 = 2;
const DEST_LABEL: u32 = 3;
const DEST_STATUS: u32 = 4;
const DEST_NOTE: u32 = 5;

#[derive(Debug, Default)]
struct ProjectedRow {
    time: String,
    category: String,
    label: String,
    status: String,
    note: String,
}

pub struct ConstantSheetBuilder {
    map: ColumnMap,
    time_source: TimeSource,
}

impl ConstantSheetBuilder {
    pub fn new(map: ColumnMap, time_source: TimeSource) -> Self {
        Self { map, time_source }
    }

    /// Rebuilds the `constant` sheet from the workbook's primary sheet.
    pub fn build(&self, book: &mut Spreadsheet) -> Result<()> {
        let rows = {
            let primary = book
                .get_sheet(&0)
                .ok_or_else(|| ScheduleError::MissingSheet("Sheet1".to_string()))?;
            self.project_rows(primary)
        };
        debug!("constant sheet: {} rows projected", rows.len());

        if book.get_sheet_by_name(CONSTANT_SHEET).is_some() {
            book.remove_sheet_by_name(CONSTANT_SHEET)
                .map_err(|e| ScheduleError::Xlsx(e.to_string()))?;
        }
        let sheet = book
            .new_sheet(CONSTANT_SHEET)
            .map_err(|e| ScheduleError::Xlsx(e.to_string()))?;

        for (i, row) in rows.iter().enumerate() {
            write_row(sheet, i as u32 + 1, row);
        }
        Ok(())
    }

    /// Read-only projection pass over the primary sheet.
    fn project_rows(&self, primary: &Worksheet) -> Vec<ProjectedRow> {
        let map = &self.map;
        let last_row = last_used_row(primary, map.playlist_marker)
            .max(last_used_row(primary, map.category))
            .max(last_used_row(primary, map.label))
            .max(last_used_row(primary, map.status));

        let mut rows = Vec::new();
        let mut inside_playlist = false;
        let mut payload_seen = false;
        let mut note_run_active = false;

        for row in 1..=last_row {
            let marker = cell_text(primary, map.playlist_marker, row);
            let time = self.canonical_time(primary, row);

            if marker.starts_with(MARKER_IN_PREFIX) {
                inside_playlist = true;
                payload_seen = false;
                rows.push(ProjectedRow {
                    time,
                    category: marker,
                    ..ProjectedRow::default()
                });
                continue;
            }
            if marker.starts_with(MARKER_OUT_PREFIX) {
                inside_playlist = false;
                rows.push(ProjectedRow {
                    time,
                    category: marker,
                    ..ProjectedRow::default()
                });
                continue;
            }

            let category = cell_text(primary, map.category, row);
            let label = cell_text(primary, map.label, row);
            let status = cell_text(primary, map.status, row);
            let non_blank = !category.is_empty() || !label.is_empty() || !status.is_empty();

            // Event note: one annotation per contiguous run of noted rows.
            let note_a = cell_text(primary, map.note_a, row);
            let note_b = cell_text(primary, map.note_b, row);
            let note = if !note_a.is_empty() || !note_b.is_empty() {
                if note_run_active {
                    String::new()
                } else {
                    note_run_active = true;
                    let text = if note_a.is_empty() { &note_b } else { &note_a };
                    format!("{text} {time}").trim().to_string()
                }
            } else {
                note_run_active = false;
                String::new()
            };

            if !non_blank && note.is_empty() {
                continue;
            }

            if inside_playlist && payload_seen && non_blank {
                rows.push(ProjectedRow {
                    category: SYNTHETIC_MARKER.to_string(),
                    ..ProjectedRow::default()
                });
            }
            if inside_playlist && !label.is_empty() {
                payload_seen = true;
            }

            rows.push(ProjectedRow {
                time,
                category,
                label,
                status,
                note,
            });
        }
        rows
    }

    fn canonical_time(&self, primary: &Worksheet, row: u32) -> String {
        let seconds = match self.time_source {
            TimeSource::Inline => parse_cell_time(primary, self.map.time, row),
            // Cached-values read: trust the computed value, never chase
            // raw formulas.
            TimeSource::CachedCopy => parse_time_str(&cell_text(primary, self.map.time, row)),
        };
        seconds.map(format_time).unwrap_or_default()
    }
}

/// Writes one projected row, normalizing the status column on the way out.
fn write_row(sheet: &mut Worksheet, row: u32, projected: &ProjectedRow) {
    if !projected.time.is_empty() {
        sheet
            .get_cell_mut((DEST_TIME, row))
            .set_value(projected.time.clone());
    }
    if !projected.category.is_empty() {
        sheet
            .get_cell_mut((DEST_CATEGORY, row))
            .set_value(projected.category.clone());
    }
    if !projected.label.is_empty() {
        sheet
            .get_cell_mut((DEST_LABEL, row))
            .set_value(projected.label.clone());
    }

    let status = projected.status.trim();
    if !status.is_empty() && !is_status_noise(status) {
        let normalized = match StatusCode::classify(status) {
            Some(code) => code.normalized_text(),
            None => status.to_string(),
        };
        sheet.get_cell_mut((DEST_STATUS, row)).set_value(normalized);
        sheet
            .get_style_mut((DEST_STATUS, row))
            .set_font(font_12_bold());
    }

    if !projected.note.is_empty() {
        sheet
            .get_cell_mut((DEST_NOTE, row))
            .set_value(projected.note.clone());
    }
}
