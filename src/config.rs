use crate::error::Result;
use crate::timecode::parse_time_str;
use serde::{Deserialize, Serialize};

/// Maps every business-meaningful column to its position exactly once, so
/// the rule passes address fields by name rather than by magic index.
/// All positions are 1-based, matching spreadsheet addressing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ColumnMap {
    /// Playlist sheet: raw time value (serial, text or formula).
    pub time: u32,
    /// Playlist sheet: program category / ID column.
    pub category: u32,
    /// Playlist sheet: status annotation column.
    pub status: u32,
    /// Playlist sheet: `PLAYLIST_IN_*` / `PLAYLIST_OUT_*` marker column.
    pub playlist_marker: u32,
    /// Playlist sheet: program label column.
    pub label: u32,
    /// Playlist sheet: first event-note source column.
    pub note_a: u32,
    /// Playlist sheet: second event-note source column.
    pub note_b: u32,

    /// Spot sheet: spot ID column.
    pub spot_id: u32,
    /// Spot sheet: duration-in-seconds column.
    pub duration: u32,
    /// Spot sheet: block mark column.
    pub block_mark: u32,
    /// Spot sheet: break-position column, doubles as the splice payload.
    pub position: u32,
    /// Spot sheet: trailing extra column.
    pub extra: u32,

    /// Splice destinations in the playlist sheet, in write order.
    pub splice_dest: [u32; 4],
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            time: 3,
            category: 4,
            status: 5,
            playlist_marker: 6,
            label: 7,
            note_a: 20,
            note_b: 21,
            spot_id: 7,
            duration: 8,
            block_mark: 9,
            position: 10,
            extra: 11,
            splice_dest: [4, 5, 6, 7],
        }
    }
}

/// Where splice-inserted cells take their presentation from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "PascalCase")]
pub enum StyleSource {
    /// Re-stamp each destination column with the fixed presentation table.
    #[default]
    FixedTemplate,
    /// Carry the source cell's style over together with its value.
    CopyFromSource,
}

/// Where the constant-sheet builder reads time values from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "PascalCase")]
pub enum TimeSource {
    /// Resolve formula references against the primary sheet itself.
    #[default]
    Inline,
    /// Resolve against a values-only copy holding cached formula results.
    CachedCopy,
}

/// Consolidates the pipeline variants into one parameterized engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PipelineConfig {
    pub style_source: StyleSource,
    pub time_source: TimeSource,
    /// Suffix appended before the extension of the reformatted spot sheet.
    pub pub_suffix: String,
    /// Suffix appended before the extension of the merged final schedule.
    pub final_suffix: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            style_source: StyleSource::FixedTemplate,
            time_source: TimeSource::Inline,
            pub_suffix: "_modificat".to_string(),
            final_suffix: "_modificat".to_string(),
        }
    }
}

impl PipelineConfig {
    /// The alternate naming scheme: role suffixes instead of `_modificat`.
    pub fn with_role_suffixes() -> Self {
        Self {
            pub_suffix: "_PUB_IN".to_string(),
            final_suffix: "_FINAL".to_string(),
            ..Self::default()
        }
    }
}

/// One time slot: spots whose time falls inside `[start, end]` are spliced
/// into the first marker pair found among `tags`, tried in order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimeWindow {
    /// Inclusive window start, seconds since midnight.
    pub start: u32,
    /// Inclusive window end, seconds since midnight.
    pub end: u32,
    /// Candidate marker tags, preferred variant first.
    pub tags: Vec<String>,
}

impl TimeWindow {
    pub fn contains(&self, seconds: u32) -> bool {
        (self.start..=self.end).contains(&seconds)
    }
}

/// The full day's window table. Windows are contiguous and non-overlapping
/// by construction; the default table is static configuration, not user data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IntervalTable {
    pub windows: Vec<TimeWindow>,
}

impl IntervalTable {
    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}

/// (start, end, candidate tags) triples as observed in the production
/// macro: half-hour slots from 06:00 through 01:59 the next morning.
const DEFAULT_WINDOWS: &[(&str, &str, &[&str])] = &[
    ("06:00:00", "06:30:00", &["06_30", "06_20", "06_10"]),
    ("06:30:01", "06:59:00", &["06_50", "06_40", "06_45"]),
    ("07:00:00", "07:30:00", &["07_20", "07_10", "07_30"]),
    ("07:31:00", "07:59:00", &["07_50", "07_40", "07_45"]),
    ("08:00:00", "08:31:00", &["08_20", "08_10", "08_30"]),
    ("08:32:00", "08:59:00", &["08_50", "08_40", "08_45"]),
    ("09:00:00", "09:31:00", &["09_20", "09_10", "09_30"]),
    ("09:32:00", "09:59:00", &["09_50", "09_40", "09_45"]),
    ("10:00:00", "10:31:00", &["10_20", "10_10", "10_30"]),
    ("10:32:00", "10:59:00", &["10_50", "10_40", "10_45"]),
    ("11:00:00", "11:31:00", &["11_20", "11_10", "11_30"]),
    ("11:32:00", "11:59:00", &["11_50", "11_40", "11_45"]),
    ("12:00:00", "12:31:00", &["12_20", "12_10", "12_30"]),
    ("12:32:00", "12:59:00", &["12_50", "12_40", "12_45"]),
    ("13:00:00", "13:31:00", &["13_20", "13_10", "13_30"]),
    ("13:32:00", "13:59:00", &["13_50", "13_40", "13_45"]),
    ("14:00:00", "14:31:00", &["14_20", "14_10", "14_30"]),
    ("14:32:00", "14:59:00", &["14_50", "14_40", "14_45"]),
    ("15:00:00", "15:31:00", &["15_20", "15_10", "15_30"]),
    ("15:32:00", "15:59:00", &["15_50", "15_40", "15_45"]),
    ("16:00:00", "16:31:00", &["16_20", "16_10", "16_30"]),
    ("16:32:00", "16:59:00", &["16_50", "16_40", "16_45"]),
    ("17:00:00", "17:31:00", &["17_20", "17_10", "17_30"]),
    ("17:32:00", "17:59:00", &["17_50", "17_40", "17_45"]),
    ("18:00:00", "18:31:00", &["18_20", "18_10", "18_30"]),
    ("18:32:00", "18:59:00", &["18_50", "18_40", "18_45"]),
    ("19:00:00", "19:31:00", &["19_20", "19_10", "19_30"]),
    ("19:32:00", "19:59:00", &["19_50", "19_40", "19_45"]),
    ("20:00:00", "20:31:00", &["20_20", "20_10", "20_30"]),
    ("20:32:00", "20:59:00", &["20_50", "20_40", "20_45"]),
    ("21:00:00", "21:31:00", &["21_20", "21_10", "21_30"]),
    ("21:32:00", "21:59:00", &["21_50", "21_40", "21_45"]),
    ("22:00:00", "22:31:00", &["22_20", "22_10", "22_30"]),
    ("22:32:00", "22:59:00", &["22_50", "22_40", "22_45"]),
    ("23:00:00", "23:31:00", &["23_20", "23_10", "23_30"]),
    ("23:32:00", "23:59:00", &["23_50", "23_40", "23_45"]),
    ("00:00:00", "00:31:00", &["00_20", "00_10", "00_30"]),
    ("00:32:00", "00:59:00", &["00_50", "00_40", "00_45"]),
    ("01:00:00", "01:31:00", &["01_20", "01_10", "01_30"]),
    ("01:32:00", "01:59:00", &["01_50", "01_40", "01_45"]),
];

impl Default for IntervalTable {
    fn default() -> Self {
        let windows = DEFAULT_WINDOWS
            .iter()
            .map(|(start, end, tags)| TimeWindow {
                start: parse_time_str(start).unwrap_or(0),
                end: parse_time_str(end).unwrap_or(0),
                tags: tags.iter().map(|t| t.to_string()).collect(),
            })
            .collect();
        Self { windows }
    }
}
