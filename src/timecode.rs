//! Canonical time handling: every pass talks in whole seconds since
//! midnight, converted at the edges from the encodings spreadsheets
//! actually contain (serial fraction-of-day numbers, `HH:MM:SS` text,
//! and a restricted class of additive formulas).

use chrono::{NaiveTime, Timelike};
use umya_spreadsheet::helper::coordinate::column_index_from_string;
use umya_spreadsheet::Worksheet;

pub const SECONDS_PER_DAY: u32 = 86_400;

/// Maximum formula-reference chain length before giving up. Anything deeper
/// is either a cycle or a sheet this parser was never meant to evaluate.
const MAX_RESOLVE_DEPTH: u32 = 8;

/// Parses a raw cell text into seconds since midnight.
///
/// Accepts strict `H:MM:SS` / `HH:MM:SS` text or a non-negative decimal
/// number interpreted as a fraction of a day (serial time). Anything else,
/// including `HH:MM` and out-of-range fields, is `None`.
pub fn parse_time_str(raw: &str) -> Option<u32> {
    let txt = raw.trim();
    if txt.is_empty() {
        return None;
    }

    if txt.contains(':') {
        let time = NaiveTime::parse_from_str(txt, "%H:%M:%S").ok()?;
        return Some(time.num_seconds_from_midnight());
    }

    let value: f64 = txt.parse().ok()?;
    if value < 0.0 || !value.is_finite() {
        return None;
    }
    let seconds = (value * f64::from(SECONDS_PER_DAY)).round() as u64;
    Some((seconds % u64::from(SECONDS_PER_DAY)) as u32)
}

/// Formats seconds since midnight as zero-padded `HH:MM:SS`, wrapping
/// modulo one day.
pub fn format_time(seconds: u32) -> String {
    let s = seconds % SECONDS_PER_DAY;
    format!("{:02}:{:02}:{:02}", s / 3600, (s % 3600) / 60, s % 60)
}

/// Evaluates a restricted additive time formula: `=<term>(+|-<term>)*`,
/// where a term is an A1 cell reference or a numeric/time literal.
///
/// Function calls and parentheses are rejected outright rather than
/// evaluated; `resolve` supplies the text of a referenced cell.
pub fn evaluate_formula<F>(formula: &str, resolve: F) -> Option<u32>
where
    F: Fn(u32, u32) -> Option<String>,
{
    let body = formula.trim().strip_prefix('=').unwrap_or(formula.trim());
    if body.is_empty() || body.contains('(') || body.contains(')') {
        return None;
    }

    let mut total: i64 = 0;
    for (sign, term) in split_terms(body)? {
        let seconds = if let Some((col, row)) = parse_cell_ref(term) {
            let text = resolve(col, row)?;
            parse_time_str(&text)?
        } else {
            parse_time_str(term)?
        };
        total += sign * i64::from(seconds);
    }

    Some(total.rem_euclid(i64::from(SECONDS_PER_DAY)) as u32)
}

/// Splits a formula body into signed terms. Returns `None` on empty terms
/// (e.g. `=+` or trailing operators).
fn split_terms(body: &str) -> Option<Vec<(i64, &str)>> {
    let mut terms = Vec::new();
    let mut sign: i64 = 1;
    let mut start = 0;
    let bytes = body.as_bytes();

    for (i, &b) in bytes.iter().enumerate() {
        if b == b'+' || b == b'-' {
            let term = body[start..i].trim();
            if term.is_empty() {
                // A leading sign is fine; an empty interior term is not.
                if start != 0 {
                    return None;
                }
            } else {
                terms.push((sign, term));
            }
            sign = if b == b'+' { 1 } else { -1 };
            start = i + 1;
        }
    }

    let last = body[start..].trim();
    if last.is_empty() {
        return None;
    }
    terms.push((sign, last));
    Some(terms)
}

/// Parses an A1-style reference (optionally `$`-anchored) into
/// 1-based (column, row). Returns `None` for anything else.
fn parse_cell_ref(term: &str) -> Option<(u32, u32)> {
    let cleaned: String = term.chars().filter(|c| *c != '$').collect();
    let split = cleaned.find(|c: char| c.is_ascii_digit())?;
    let (letters, digits) = cleaned.split_at(split);
    if letters.is_empty() || !letters.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let row: u32 = digits.parse().ok()?;
    if row == 0 {
        return None;
    }
    Some((column_index_from_string(letters), row))
}

/// Reads a cell as a time, preferring the cached/computed value over the
/// raw formula; falls back to evaluating the restricted formula form with
/// references resolved against the same sheet.
pub fn parse_cell_time(sheet: &Worksheet, col: u32, row: u32) -> Option<u32> {
    parse_cell_time_at_depth(sheet, col, row, 0)
}

fn parse_cell_time_at_depth(sheet: &Worksheet, col: u32, row: u32, depth: u32) -> Option<u32> {
    if depth > MAX_RESOLVE_DEPTH {
        return None;
    }

    let value = sheet.get_value((col, row));
    if !value.trim().is_empty() {
        return parse_time_str(&value);
    }

    let cell = sheet.get_cell((col, row))?;
    if !cell.is_formula() {
        return None;
    }
    let formula = cell.get_formula().to_string();
    evaluate_formula(&formula, |ref_col, ref_row| {
        let text = sheet.get_value((ref_col, ref_row));
        if !text.trim().is_empty() {
            return Some(text);
        }
        // Referenced cell has no cached value; chase its formula instead.
        parse_cell_time_at_depth(sheet, ref_col, ref_row, depth + 1).map(format_time)
    })
}
