use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("Input file not found: {0}")]
    InputNotFound(PathBuf),

    #[error("Unsupported format for {path}: expected one of {expected}")]
    UnsupportedFormat { path: PathBuf, expected: String },

    #[error("No data found in the {column} column beyond the header row")]
    EmptyData { column: String },

    #[error("Workbook has no sheet named '{0}'")]
    MissingSheet(String),

    #[error("Workbook contains no worksheets: {0}")]
    NoWorksheets(PathBuf),

    #[error("Structural mismatch: {0}")]
    StructuralMismatch(String),

    #[error("Spreadsheet error: {0}")]
    Xlsx(String),

    #[error("Legacy workbook error: {0}")]
    LegacyRead(#[from] calamine::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
