//! File-boundary concerns: input validation per role, legacy `.xls`
//! conversion, output naming, and workbook load/save.
//!
//! Macro-enabled (`.xlsm`) inputs round-trip their VBA payload through the
//! spreadsheet library untouched; legacy `.xls` inputs are converted to the
//! modern format values-only, which is an accepted information loss for
//! that format.

use crate::error::{Result, ScheduleError};
use calamine::{open_workbook_auto, Data, Reader};
use log::{info, warn};
use std::path::{Path, PathBuf};
use umya_spreadsheet::Spreadsheet;

/// Which input slot a file fills; the accepted extension set differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputRole {
    /// The IN playlist: legacy workbooks are accepted and converted.
    Playlist,
    /// The PUB_Zero / PUB_IN spot sheet: modern formats only.
    SpotSheet,
}

impl InputRole {
    fn accepted(&self) -> &'static [&'static str] {
        match self {
            Self::Playlist => &["xls", "xlsx", "xlsm"],
            Self::SpotSheet => &["xlsx", "xlsm"],
        }
    }
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_lowercase()
}

/// Validates existence and extension for the given role.
pub fn ensure_input(path: &Path, role: InputRole) -> Result<()> {
    if !path.is_file() {
        return Err(ScheduleError::InputNotFound(path.to_path_buf()));
    }
    let ext = extension_of(path);
    if !role.accepted().contains(&ext.as_str()) {
        return Err(ScheduleError::UnsupportedFormat {
            path: path.to_path_buf(),
            expected: role.accepted().join(", "),
        });
    }
    Ok(())
}

/// Loads a workbook for the given role, converting legacy inputs.
pub fn load_workbook(path: &Path, role: InputRole) -> Result<Spreadsheet> {
    ensure_input(path, role)?;
    let book = if extension_of(path) == "xls" {
        info!("converting legacy workbook {} (values only)", path.display());
        convert_legacy(path)?
    } else {
        umya_spreadsheet::reader::xlsx::read(path)
            .map_err(|e| ScheduleError::Xlsx(format!("{e:?}")))?
    };

    if book.get_sheet(&0).is_none() {
        return Err(ScheduleError::NoWorksheets(path.to_path_buf()));
    }
    Ok(book)
}

pub fn save_workbook(book: &Spreadsheet, path: &Path) -> Result<()> {
    umya_spreadsheet::writer::xlsx::write(book, path)
        .map_err(|e| ScheduleError::Xlsx(format!("{e:?}")))?;
    info!("wrote {}", path.display());
    Ok(())
}

/// Output path next to the input: `<stem><suffix>.<ext>`. Converted legacy
/// inputs come out as `.xlsx` since their binary format is left behind.
pub fn derive_output_path(input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    let ext = match extension_of(input).as_str() {
        "xls" | "" => "xlsx".to_string(),
        other => other.to_string(),
    };
    input.with_file_name(format!("{stem}{suffix}.{ext}"))
}

/// Values-only conversion of a legacy binary workbook.
fn convert_legacy(path: &Path) -> Result<Spreadsheet> {
    let mut legacy = open_workbook_auto(path)?;
    let names = legacy.sheet_names().to_vec();

    let mut book = umya_spreadsheet::new_file();
    for (index, name) in names.iter().enumerate() {
        let range = legacy.worksheet_range(name)?;
        let sheet = if index == 0 {
            let sheet = book.get_sheet_mut(&0).expect("new workbook has a sheet");
            sheet.set_name(name);
            sheet
        } else {
            book.new_sheet(name)
                .map_err(|e| ScheduleError::Xlsx(e.to_string()))?
        };

        let Some((start_row, start_col)) = range.start() else {
            continue;
        };
        for (r, c, data) in range.used_cells() {
            let row = start_row + r as u32 + 1;
            let col = start_col + c as u32 + 1;
            let cell = sheet.get_cell_mut((col, row));
            match data {
                Data::String(s) => {
                    cell.set_value_string(s.clone());
                }
                Data::Float(f) => {
                    cell.set_value_number(*f);
                }
                Data::Int(i) => {
                    cell.set_value_number(*i as f64);
                }
                Data::Bool(b) => {
                    cell.set_value_bool(*b);
                }
                Data::DateTime(dt) => {
                    // Keep the serial form; the time parser understands it.
                    cell.set_value_number(dt.as_f64());
                }
                Data::DateTimeIso(s) | Data::DurationIso(s) => {
                    cell.set_value_string(s.clone());
                }
                Data::Error(e) => {
                    warn!("cell error {e:?} at {name}!r{row}c{col} dropped in conversion");
                }
                _ => {}
            }
        }
    }
    Ok(book)
}
