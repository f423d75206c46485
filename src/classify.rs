//! Text and style classification rules.
//!
//! All tables are plain data with `Default` impls carrying the production
//! rule sets, so tests (and callers) can swap them out wholesale.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use umya_spreadsheet::Style;

/// Fill encodings treated as "yellow". Anything else, including
/// near-yellow colors, is not.
const YELLOW_ARGB: [&str; 2] = ["FFFFFF00", "FFFF00"];

/// Rules deciding which category values exempt a row from red
/// highlighting. Matching is normalized-lowercase throughout; the tables
/// store lowercase entries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExclusionRules {
    pub prefixes: Vec<String>,
    pub exact: BTreeSet<String>,
}

impl Default for ExclusionRules {
    fn default() -> Self {
        let prefixes = [
            "id pub",
            "id_pub_",
            "id promo",
            "id_promo_",
            "interzis",
            "cca_",
            "cca orele",
        ]
        .iter()
        .map(|p| p.to_string())
        .collect();

        // Historical program titles grandfathered out of highlighting.
        let exact = [
            "id_jtv_2024_dua_lipa_dance_the_night",
            "id_jtv_2024_miley_cyrus_flowers",
            "id_jtv_2024_the weeknd_ariana grande_save_your_tears",
            "id 15 ani_25sec_v1",
            "youtube sofia obada jurnalul orei 19 ok",
            "jurnalsportiv",
            "meteonew",
        ]
        .iter()
        .map(|t| t.to_string())
        .collect();

        Self { prefixes, exact }
    }
}

impl ExclusionRules {
    pub fn is_excluded(&self, text: &str) -> bool {
        let normalized = text.trim().to_lowercase();
        if normalized.is_empty() {
            return false;
        }
        self.prefixes.iter().any(|p| normalized.starts_with(p.as_str()))
            || self.exact.contains(&normalized)
    }
}

/// The closed set of status annotations recognized by the constant-sheet
/// normalization pass. Unknown text classifies as `None`, never an error.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StatusCode {
    PubStart,
    PubStop,
    Ceas,
    Ap,
    CrAp,
    Cr12,
    Cr15,
    Reluare,
    Premiera,
}

impl StatusCode {
    pub fn classify(text: &str) -> Option<Self> {
        let normalized = text.trim().to_lowercase();
        match normalized.as_str() {
            "pub_start" => Some(Self::PubStart),
            "pub_stop" => Some(Self::PubStop),
            "ceas" => Some(Self::Ceas),
            "ap" => Some(Self::Ap),
            "cr+ap" => Some(Self::CrAp),
            "cr+12" => Some(Self::Cr12),
            "cr+15" => Some(Self::Cr15),
            _ if normalized.starts_with("reluare_") => Some(Self::Reluare),
            _ if normalized.starts_with("premiera_") => Some(Self::Premiera),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::PubStart => "pub_start",
            Self::PubStop => "pub_stop",
            Self::Ceas => "ceas",
            Self::Ap => "ap",
            Self::CrAp => "cr+ap",
            Self::Cr12 => "cr+12",
            Self::Cr15 => "cr+15",
            Self::Reluare => "reluare",
            Self::Premiera => "premiera",
        }
    }

    pub fn color_number(&self) -> u32 {
        match self {
            Self::PubStart | Self::PubStop => 3,
            Self::Reluare | Self::Premiera => 4,
            Self::Ceas => 5,
            Self::Ap | Self::CrAp => 6,
            Self::Cr12 | Self::Cr15 => 7,
        }
    }

    /// The normalized wire form written into the constant sheet.
    pub fn normalized_text(&self) -> String {
        format!("{}   #COLOR {}", self.label(), self.color_number())
    }
}

/// Literal status values treated as noise and blanked outright.
pub fn is_status_noise(text: &str) -> bool {
    matches!(text.trim(), "ceas+direct" | "ceas + direct" | ".")
}

/// True only for the two fill encodings of yellow used in production
/// sheets; no fuzzy color matching.
pub fn is_yellow_fill(style: &Style) -> bool {
    style
        .get_fill()
        .and_then(|fill| fill.get_pattern_fill())
        .and_then(|pattern| pattern.get_foreground_color())
        .map(|color| YELLOW_ARGB.contains(&color.get_argb()))
        .unwrap_or(false)
}
