//! The merge engine: ad blocks extracted from the formatted spot sheet
//! replace the interior of their time slot's marker pair in the playlist.
//!
//! Extraction and pair lookup are read-only; the resulting edits are
//! applied in a single bottom-to-top pass so no edit ever invalidates the
//! row indices of another (collect-then-apply).

use crate::classify::ExclusionRules;
use crate::config::{ColumnMap, IntervalTable, PipelineConfig, StyleSource};
use crate::error::Result;
use crate::extract::{extract_block, SpotRecord};
use crate::grid::{cell_text, last_used_row};
use crate::markers::{clear_marker_regions, find_pair, insert_rows};
use crate::style::{
    align_center, align_left, align_right, apply_highlight, font_14_bold, set_thin_border,
    LIGHT_GREEN, RED,
};
use crate::timecode::format_time;
use log::{debug, info};
use umya_spreadsheet::{Style, Worksheet};

/// Fills the status column red wherever it is non-empty and the category
/// column does not carry an excluded ID.
pub fn highlight_unclassified(sheet: &mut Worksheet, rules: &ExclusionRules, map: &ColumnMap) {
    let last_row = last_used_row(sheet, map.category).max(last_used_row(sheet, map.status));
    let mut highlighted = 0;
    for row in 1..=last_row {
        let status = cell_text(sheet, map.status, row);
        if status.is_empty() {
            continue;
        }
        let category = cell_text(sheet, map.category, row);
        if !rules.is_excluded(&category) {
            sheet
                .get_style_mut((map.status, row))
                .set_background_color(RED);
            highlighted += 1;
        }
    }
    debug!("highlighted {highlighted} unclassified status rows");
}

pub struct SpliceEngine {
    map: ColumnMap,
    table: IntervalTable,
    config: PipelineConfig,
}

struct Edit {
    start_row: u32,
    tag: String,
    block: Vec<SpotRecord>,
}

impl SpliceEngine {
    pub fn new(map: ColumnMap, table: IntervalTable, config: PipelineConfig) -> Self {
        Self { map, table, config }
    }

    /// Splices every window's block from `source` into `target`.
    ///
    /// Interiors of all marker pairs are cleared first; windows with no
    /// extracted block leave their pair untouched (markers adjacent), and
    /// windows whose candidate tags are all absent are skipped.
    pub fn splice_sheet(&self, target: &mut Worksheet, source: &Worksheet) -> Result<()> {
        clear_marker_regions(target, self.map.playlist_marker)?;

        let mut edits: Vec<Edit> = Vec::new();
        for window in &self.table.windows {
            let block = extract_block(source, window, &self.map);
            if block.is_empty() {
                continue;
            }

            let mut matched = None;
            for tag in &window.tags {
                if let Some((start_row, _)) = find_pair(target, self.map.playlist_marker, tag)? {
                    matched = Some((start_row, tag.clone()));
                    break;
                }
            }
            match matched {
                Some((start_row, tag)) => edits.push(Edit {
                    start_row,
                    tag,
                    block,
                }),
                None => debug!(
                    "no marker pair on target for window {}-{}; block of {} dropped",
                    format_time(window.start),
                    format_time(window.end),
                    block.len()
                ),
            }
        }

        // Bottom-to-top: inserting lower regions first keeps the collected
        // start rows of the regions above them valid.
        edits.sort_by(|a, b| b.start_row.cmp(&a.start_row));
        let total: usize = edits.iter().map(|e| e.block.len()).sum();
        for edit in &edits {
            self.write_block(target, edit);
        }
        info!("spliced {} spot rows across {} slots", total, edits.len());
        Ok(())
    }

    fn write_block(&self, target: &mut Worksheet, edit: &Edit) {
        let count = edit.block.len() as u32;
        insert_rows(target, edit.start_row + 1, count);
        debug!(
            "inserting {count} rows into PLAYLIST_IN_{} at row {}",
            edit.tag, edit.start_row
        );

        let [dest_id, dest_duration, dest_payload, dest_mark] = self.map.splice_dest;
        for (i, record) in edit.block.iter().enumerate() {
            let row = edit.start_row + 1 + i as u32;
            match self.config.style_source {
                StyleSource::CopyFromSource => {
                    record.spot_id.write(target, dest_id, row);
                    record.duration.write(target, dest_duration, row);
                    record.payload.write(target, dest_payload, row);
                    record.block_mark.write(target, dest_mark, row);
                }
                StyleSource::FixedTemplate => {
                    self.write_templated(target, record, row);
                }
            }
        }
    }

    fn write_templated(&self, target: &mut Worksheet, record: &SpotRecord, row: u32) {
        let [dest_id, dest_duration, dest_payload, dest_mark] = self.map.splice_dest;

        let mut style = Style::default();
        apply_highlight(&mut style, font_14_bold(), align_left());
        record.spot_id.write_with_style(target, dest_id, row, style);

        let mut style = Style::default();
        apply_highlight(&mut style, font_14_bold(), align_right());
        record.duration.write_with_style(target, dest_duration, row, style);

        let mut style = Style::default();
        apply_highlight(&mut style, font_14_bold(), align_center());
        record.payload.write_with_style(target, dest_payload, row, style);

        // The block mark keeps no font/alignment template; only presence
        // earns it a fill and border.
        let mut style = Style::default();
        if !record.block_mark.is_empty() {
            style.set_background_color(LIGHT_GREEN);
            set_thin_border(&mut style);
        }
        record.block_mark.write_with_style(target, dest_mark, row, style);
    }
}

/// The combined flow at sheet level: red-highlight pass, marker-region
/// clearing, then the window-by-window splice.
pub fn run_combined_flow_on_sheets(
    target: &mut Worksheet,
    source: &Worksheet,
    rules: &ExclusionRules,
    engine: &SpliceEngine,
) -> Result<()> {
    highlight_unclassified(target, rules, &engine.map);
    engine.splice_sheet(target, source)
}
