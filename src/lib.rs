//! # Broadcast Schedule Builder
//!
//! A library for transforming broadcast-schedule spreadsheets: a daily
//! playlist ("IN") and an advertising-spot sheet ("PUB_Zero") go in, a
//! reformatted spot sheet ("PUB_IN") and a merged final rundown ("FINAL")
//! come out.
//!
//! ## Core Concepts
//!
//! - **Marker pair**: `PLAYLIST_IN_<tag>` / `PLAYLIST_OUT_<tag>` rows
//!   bounding an ad-break region in the playlist
//! - **Time window**: a configured slot (`06:00-06:30`, ...) with an
//!   ordered list of candidate marker tags
//! - **Block**: the spot rows extracted from PUB_IN for one window,
//!   values and styles captured together
//! - **Splice**: replacing a marker pair's interior with a block's rows
//! - **Constant sheet**: a derived projection of the playlist with
//!   synthetic break markers and de-duplicated event notes
//!
//! ## Example
//!
//! ```rust,ignore
//! use broadcast_schedule_builder::ScheduleProcessor;
//! use std::path::Path;
//!
//! let processor = ScheduleProcessor::default();
//! let (pub_in, final_path) =
//!     processor.process_pair(Path::new("IN.xlsx"), Path::new("PUB_Zero.xlsx"))?;
//! ```
//!
//! Each call loads a fresh workbook, runs the passes in a fixed order and
//! writes a single output file; nothing is retained across invocations,
//! and no output is written when a pass fails.

pub mod classify;
pub mod config;
pub mod constant;
pub mod error;
pub mod extract;
pub mod grid;
pub mod io;
pub mod markers;
pub mod pubfmt;
pub mod splice;
pub mod style;
pub mod timecode;

pub use classify::{is_yellow_fill, ExclusionRules, StatusCode};
pub use config::{ColumnMap, IntervalTable, PipelineConfig, StyleSource, TimeSource, TimeWindow};
pub use constant::ConstantSheetBuilder;
pub use error::{Result, ScheduleError};
pub use extract::{extract_block, SpotRecord};
pub use pubfmt::PubFormatter;
pub use splice::{highlight_unclassified, run_combined_flow_on_sheets, SpliceEngine};
pub use timecode::{format_time, parse_time_str};

use crate::constant::CONSTANT_SHEET;
use crate::io::InputRole;
use log::info;
use std::path::{Path, PathBuf};

/// The transformation engine behind the two caller entry points, holding
/// the rule tables and pipeline configuration for one family of runs.
pub struct ScheduleProcessor {
    map: ColumnMap,
    rules: ExclusionRules,
    table: IntervalTable,
    config: PipelineConfig,
}

impl Default for ScheduleProcessor {
    fn default() -> Self {
        Self {
            map: ColumnMap::default(),
            rules: ExclusionRules::default(),
            table: IntervalTable::default(),
            config: PipelineConfig::default(),
        }
    }
}

impl ScheduleProcessor {
    pub fn new(
        map: ColumnMap,
        rules: ExclusionRules,
        table: IntervalTable,
        config: PipelineConfig,
    ) -> Self {
        Self {
            map,
            rules,
            table,
            config,
        }
    }

    /// Reformats the spot sheet (columns G-K) and writes it next to its
    /// input with the configured suffix.
    pub fn format_pub(&self, pub_zero_path: &Path) -> Result<PathBuf> {
        info!("formatting spot sheet {}", pub_zero_path.display());
        let mut book = io::load_workbook(pub_zero_path, InputRole::SpotSheet)?;
        let sheet = primary_sheet_mut(&mut book)?;
        PubFormatter::new(self.map.clone()).format_sheet(sheet)?;

        let out_path = io::derive_output_path(pub_zero_path, &self.config.pub_suffix);
        io::save_workbook(&book, &out_path)?;
        Ok(out_path)
    }

    /// Splices the formatted spot sheet into the playlist and writes the
    /// merged final schedule.
    pub fn run_combined_flow(&self, in_path: &Path, pub_in_path: &Path) -> Result<PathBuf> {
        info!(
            "merging {} with {}",
            in_path.display(),
            pub_in_path.display()
        );
        let mut target_book = io::load_workbook(in_path, InputRole::Playlist)?;
        let source_book = io::load_workbook(pub_in_path, InputRole::SpotSheet)?;

        let source = source_book
            .get_sheet(&0)
            .ok_or_else(|| ScheduleError::NoWorksheets(pub_in_path.to_path_buf()))?;
        let target = primary_sheet_mut(&mut target_book)?;

        let engine = SpliceEngine::new(
            self.map.clone(),
            self.table.clone(),
            self.config.clone(),
        );
        run_combined_flow_on_sheets(target, source, &self.rules, &engine)?;

        let out_path = io::derive_output_path(in_path, &self.config.final_suffix);
        io::save_workbook(&target_book, &out_path)?;
        Ok(out_path)
    }

    /// The single-sheet variant: rebuilds the `constant` projection sheet
    /// inside the playlist workbook.
    pub fn run_constant_flow(&self, in_path: &Path) -> Result<PathBuf> {
        info!(
            "building {CONSTANT_SHEET} sheet for {}",
            in_path.display()
        );
        let mut book = io::load_workbook(in_path, InputRole::Playlist)?;
        ConstantSheetBuilder::new(self.map.clone(), self.config.time_source).build(&mut book)?;

        let out_path = io::derive_output_path(in_path, &self.config.final_suffix);
        io::save_workbook(&book, &out_path)?;
        Ok(out_path)
    }

    /// The full pipeline: PUB_Zero is reformatted into PUB_IN, then
    /// spliced into IN to produce FINAL. Returns both output paths.
    pub fn process_pair(&self, in_path: &Path, pub_zero_path: &Path) -> Result<(PathBuf, PathBuf)> {
        let pub_in_path = self.format_pub(pub_zero_path)?;
        let final_path = self.run_combined_flow(in_path, &pub_in_path)?;
        Ok((pub_in_path, final_path))
    }
}

fn primary_sheet_mut(
    book: &mut umya_spreadsheet::Spreadsheet,
) -> Result<&mut umya_spreadsheet::Worksheet> {
    book.get_sheet_mut(&0)
        .ok_or_else(|| ScheduleError::MissingSheet("Sheet1".to_string()))
}

/// Reformats a spot sheet with the default rule tables.
pub fn format_pub(pub_zero_path: &Path) -> Result<PathBuf> {
    ScheduleProcessor::default().format_pub(pub_zero_path)
}

/// Runs the combined IN + PUB_IN merge with the default rule tables.
pub fn run_combined_flow(in_path: &Path, pub_in_path: &Path) -> Result<PathBuf> {
    ScheduleProcessor::default().run_combined_flow(in_path, pub_in_path)
}

/// Rebuilds the constant sheet with the default rule tables.
pub fn run_constant_flow(in_path: &Path) -> Result<PathBuf> {
    ScheduleProcessor::default().run_constant_flow(in_path)
}
