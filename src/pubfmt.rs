//! The spot-sheet formatting pass: columns G through K of PUB_Zero are
//! normalized in place to produce PUB_IN.
//!
//! The pass is row-local: no row inspects another row's content, so rows
//! may be processed in any order with an identical result. Re-running the
//! pass on its own output is a no-op on the duration and position columns.

use crate::config::ColumnMap;
use crate::error::{Result, ScheduleError};
use crate::grid::{cell_text, last_used_row};
use crate::style::{
    align_center, align_left, align_right, apply_highlight, clear_border, clear_fill,
    font_12_bold, font_14_bold, set_thin_border, GREEN,
};
use crate::timecode::format_time;
use log::debug;
use umya_spreadsheet::Worksheet;

pub struct PubFormatter {
    map: ColumnMap,
}

impl PubFormatter {
    pub fn new(map: ColumnMap) -> Self {
        Self { map }
    }

    /// Formats every data row of the spot sheet (row 2 up to the last row
    /// with a spot ID).
    pub fn format_sheet(&self, sheet: &mut Worksheet) -> Result<()> {
        let last_row = last_used_row(sheet, self.map.spot_id);
        if last_row <= 1 {
            return Err(ScheduleError::EmptyData {
                column: "spot ID".to_string(),
            });
        }

        for row in 2..=last_row {
            self.format_row(sheet, row);
        }
        debug!("formatted {} spot rows", last_row - 1);
        Ok(())
    }

    fn format_row(&self, sheet: &mut Worksheet, row: u32) {
        let map = &self.map;

        // Spot ID: bold on yellow, left-aligned, regardless of content.
        let style = sheet.get_style_mut((map.spot_id, row));
        apply_highlight(style, font_12_bold(), align_left());

        // Duration: positive numbers are second counts; rewrite as text.
        // Already-formatted HH:MM:SS values no longer parse as numbers,
        // which is what makes re-running the pass a no-op here.
        let raw = cell_text(sheet, map.duration, row);
        if let Ok(seconds) = raw.parse::<f64>() {
            if seconds > 0.0 {
                sheet
                    .get_cell_mut((map.duration, row))
                    .set_value(format_time(seconds as u32));
            }
        }
        let style = sheet.get_style_mut((map.duration, row));
        apply_highlight(style, font_12_bold(), align_right());

        // Block mark: decorated only when present; stale decoration is
        // cleared when the cell is empty.
        if !cell_text(sheet, map.block_mark, row).is_empty() {
            let style = sheet.get_style_mut((map.block_mark, row));
            style.set_font(font_14_bold());
            style.set_alignment(align_center());
            style.set_background_color(GREEN);
            set_thin_border(style);
        } else {
            let style = sheet.get_style_mut((map.block_mark, row));
            clear_border(style);
            clear_fill(style);
        }

        // Position: wrap in underscores, single digits asymmetrically.
        let raw = cell_text(sheet, map.position, row);
        if !raw.is_empty() && !is_wrapped(&raw) {
            let wrapped = if is_single_digit(&raw) {
                format!("_{}__", raw)
            } else {
                format!("_{}_", raw)
            };
            sheet.get_cell_mut((map.position, row)).set_value(wrapped);
        }
        let style = sheet.get_style_mut((map.position, row));
        apply_highlight(style, font_14_bold(), align_center());

        // Extra: border tracks presence.
        if !cell_text(sheet, map.extra, row).is_empty() {
            let style = sheet.get_style_mut((map.extra, row));
            set_thin_border(style);
        } else {
            let style = sheet.get_style_mut((map.extra, row));
            clear_border(style);
            clear_fill(style);
        }
    }
}

fn is_wrapped(text: &str) -> bool {
    text.len() >= 2 && text.starts_with('_') && text.ends_with('_')
}

fn is_single_digit(text: &str) -> bool {
    matches!(text.parse::<u32>(), Ok(n) if (1..=9).contains(&n))
}
