use anyhow::Result;
use broadcast_schedule_builder::{
    format_time, parse_time_str, ScheduleError, ScheduleProcessor,
};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use umya_spreadsheet::Spreadsheet;

fn cell(book: &Spreadsheet, col: u32, row: u32) -> String {
    book.get_sheet(&0)
        .unwrap()
        .get_value((col, row))
        .trim()
        .to_string()
}

fn fill_argb(book: &Spreadsheet, col: u32, row: u32) -> Option<String> {
    book.get_sheet(&0)?
        .get_cell((col, row))?
        .get_style()
        .get_fill()
        .and_then(|f| f.get_pattern_fill())
        .and_then(|p| p.get_foreground_color())
        .map(|c| c.get_argb().to_string())
}

fn find_row(book: &Spreadsheet, col: u32, needle: &str) -> Option<u32> {
    let sheet = book.get_sheet(&0)?;
    (1..=sheet.get_highest_row()).find(|row| sheet.get_value((col, *row)).trim() == needle)
}

fn save(book: &Spreadsheet, dir: &TempDir, name: &str) -> Result<PathBuf> {
    let path = dir.path().join(name);
    umya_spreadsheet::writer::xlsx::write(book, &path)
        .map_err(|e| anyhow::anyhow!("write {name}: {e:?}"))?;
    Ok(path)
}

fn load(path: &Path) -> Result<Spreadsheet> {
    umya_spreadsheet::reader::xlsx::read(path)
        .map_err(|e| anyhow::anyhow!("read {}: {e:?}", path.display()))
}

/// An IN playlist with one ad-break marker pair holding stale content,
/// plus two program rows for the exclusion check.
fn playlist_fixture() -> Spreadsheet {
    let mut book = umya_spreadsheet::new_file();
    let sheet = book.get_sheet_mut(&0).unwrap();
    sheet.get_cell_mut((6, 2)).set_value("PLAYLIST_IN_06_30");
    sheet.get_cell_mut((6, 3)).set_value("stale spot");
    sheet.get_cell_mut((6, 4)).set_value("stale spot");
    sheet.get_cell_mut((6, 5)).set_value("PLAYLIST_OUT_06_30");
    sheet.get_cell_mut((4, 7)).set_value("ID PUB_1234");
    sheet.get_cell_mut((5, 7)).set_value("promo break");
    sheet.get_cell_mut((4, 8)).set_value("Fotbal Live");
    sheet.get_cell_mut((5, 8)).set_value("sport");
    book
}

/// A PUB_Zero sheet with three spots inside the 06:00-06:30 window.
fn pub_zero_fixture() -> Spreadsheet {
    let mut book = umya_spreadsheet::new_file();
    let sheet = book.get_sheet_mut(&0).unwrap();
    sheet.get_cell_mut((7, 1)).set_value("Spot");

    let rows: [(&str, &str, i32, &str, &str); 3] = [
        ("06:05:00", "SPOT_A", 30, "B1", "1"),
        ("06:10:00", "SPOT_B", 20, "", "2"),
        ("06:15:00", "SPOT_C", 95, "B2", "12"),
    ];
    for (i, (time, id, duration, mark, position)) in rows.iter().enumerate() {
        let row = i as u32 + 2;
        sheet.get_cell_mut((3, row)).set_value(*time);
        sheet.get_cell_mut((7, row)).set_value(*id);
        sheet.get_cell_mut((8, row)).set_value_number(*duration);
        if !mark.is_empty() {
            sheet.get_cell_mut((9, row)).set_value(*mark);
        }
        sheet.get_cell_mut((10, row)).set_value(*position);
    }
    book
}

#[test]
fn test_process_pair_end_to_end() -> Result<()> {
    let dir = TempDir::new()?;
    let in_path = save(&playlist_fixture(), &dir, "IN.xlsx")?;
    let pub_zero_path = save(&pub_zero_fixture(), &dir, "PUB_Zero.xlsx")?;

    let processor = ScheduleProcessor::default();
    let (pub_in_path, final_path) = processor.process_pair(&in_path, &pub_zero_path)?;

    assert_eq!(pub_in_path, dir.path().join("PUB_Zero_modificat.xlsx"));
    assert_eq!(final_path, dir.path().join("IN_modificat.xlsx"));

    // PUB_IN: durations became time text, positions are wrapped.
    let pub_in = load(&pub_in_path)?;
    assert_eq!(cell(&pub_in, 8, 2), "00:00:30");
    assert_eq!(cell(&pub_in, 8, 4), "00:01:35");
    assert_eq!(cell(&pub_in, 10, 2), "_1__");
    assert_eq!(cell(&pub_in, 10, 4), "_12_");

    // FINAL: the stale interior was replaced by exactly three spot rows,
    // D/E/F/G populated from PUB_IN's G/H/J/I in source order.
    let final_book = load(&final_path)?;
    assert_eq!(cell(&final_book, 6, 2), "PLAYLIST_IN_06_30");
    assert_eq!(cell(&final_book, 4, 3), "SPOT_A");
    assert_eq!(cell(&final_book, 5, 3), "00:00:30");
    assert_eq!(cell(&final_book, 6, 3), "_1__");
    assert_eq!(cell(&final_book, 7, 3), "B1");
    assert_eq!(cell(&final_book, 4, 4), "SPOT_B");
    assert_eq!(cell(&final_book, 4, 5), "SPOT_C");
    assert_eq!(cell(&final_book, 6, 6), "PLAYLIST_OUT_06_30");
    Ok(())
}

#[test]
fn test_exclusion_rules_drive_red_highlight() -> Result<()> {
    let dir = TempDir::new()?;
    let in_path = save(&playlist_fixture(), &dir, "IN.xlsx")?;
    let pub_zero_path = save(&pub_zero_fixture(), &dir, "PUB_Zero.xlsx")?;

    let processor = ScheduleProcessor::default();
    let (_, final_path) = processor.process_pair(&in_path, &pub_zero_path)?;

    // Splicing shifts rows, so locate the two program rows by content.
    let final_book = load(&final_path)?;
    let excluded_row = find_row(&final_book, 4, "ID PUB_1234").expect("excluded row present");
    let flagged_row = find_row(&final_book, 4, "Fotbal Live").expect("flagged row present");

    // Excluded ID keeps its status cell uncolored; the plain program row
    // goes red.
    assert_ne!(
        fill_argb(&final_book, 5, excluded_row),
        Some("FF0000".to_string())
    );
    assert_eq!(
        fill_argb(&final_book, 5, flagged_row),
        Some("FF0000".to_string())
    );
    Ok(())
}

#[test]
fn test_window_priority_fallback() -> Result<()> {
    let dir = TempDir::new()?;

    // The preferred 06_30 pair is absent; 06_20 must receive the block.
    let mut book = umya_spreadsheet::new_file();
    {
        let sheet = book.get_sheet_mut(&0).unwrap();
        sheet.get_cell_mut((6, 2)).set_value("PLAYLIST_IN_06_20");
        sheet.get_cell_mut((6, 3)).set_value("PLAYLIST_OUT_06_20");
    }
    let in_path = save(&book, &dir, "IN.xlsx")?;
    let pub_in_path = save(&pub_zero_fixture(), &dir, "PUB_IN.xlsx")?;

    let processor = ScheduleProcessor::default();
    let final_path = processor.run_combined_flow(&in_path, &pub_in_path)?;

    let final_book = load(&final_path)?;
    assert_eq!(cell(&final_book, 6, 2), "PLAYLIST_IN_06_20");
    assert_eq!(cell(&final_book, 4, 3), "SPOT_A");
    assert_eq!(cell(&final_book, 4, 5), "SPOT_C");
    assert_eq!(cell(&final_book, 6, 6), "PLAYLIST_OUT_06_20");
    Ok(())
}

#[test]
fn test_pub_formatting_is_idempotent() -> Result<()> {
    let dir = TempDir::new()?;
    let pub_zero_path = save(&pub_zero_fixture(), &dir, "PUB_Zero.xlsx")?;

    let processor = ScheduleProcessor::default();
    let first = processor.format_pub(&pub_zero_path)?;
    let second = processor.format_pub(&first)?;

    let first_book = load(&first)?;
    let second_book = load(&second)?;
    for row in 2..=4 {
        assert_eq!(cell(&second_book, 8, row), cell(&first_book, 8, row));
        assert_eq!(cell(&second_book, 10, row), cell(&first_book, 10, row));
    }
    Ok(())
}

#[test]
fn test_unmatched_marker_aborts_without_output() -> Result<()> {
    let dir = TempDir::new()?;

    let mut book = umya_spreadsheet::new_file();
    {
        let sheet = book.get_sheet_mut(&0).unwrap();
        sheet.get_cell_mut((6, 2)).set_value("PLAYLIST_IN_06_30");
        sheet.get_cell_mut((6, 3)).set_value("stale spot");
    }
    let in_path = save(&book, &dir, "IN.xlsx")?;
    let pub_in_path = save(&pub_zero_fixture(), &dir, "PUB_IN.xlsx")?;

    let processor = ScheduleProcessor::default();
    let err = processor
        .run_combined_flow(&in_path, &pub_in_path)
        .unwrap_err();
    assert!(matches!(err, ScheduleError::StructuralMismatch(_)));
    assert!(!dir.path().join("IN_modificat.xlsx").exists());
    Ok(())
}

#[test]
fn test_empty_spot_sheet_is_rejected() -> Result<()> {
    let dir = TempDir::new()?;

    let mut book = umya_spreadsheet::new_file();
    book.get_sheet_mut(&0)
        .unwrap()
        .get_cell_mut((7, 1))
        .set_value("Spot");
    let pub_zero_path = save(&book, &dir, "PUB_Zero.xlsx")?;

    let err = ScheduleProcessor::default()
        .format_pub(&pub_zero_path)
        .unwrap_err();
    assert!(matches!(err, ScheduleError::EmptyData { .. }));
    assert!(!dir.path().join("PUB_Zero_modificat.xlsx").exists());
    Ok(())
}

#[test]
fn test_constant_flow_round_trips_through_files() -> Result<()> {
    let dir = TempDir::new()?;

    let mut book = umya_spreadsheet::new_file();
    {
        let sheet = book.get_sheet_mut(&0).unwrap();
        sheet.get_cell_mut((3, 1)).set_value("06:00:00");
        sheet.get_cell_mut((4, 1)).set_value("Matinal");
        sheet.get_cell_mut((5, 1)).set_value("pub_start");
        sheet.get_cell_mut((6, 2)).set_value("PLAYLIST_IN_06_30");
        sheet.get_cell_mut((7, 3)).set_value("Spot 1");
        sheet.get_cell_mut((7, 4)).set_value("Spot 2");
        sheet.get_cell_mut((6, 5)).set_value("PLAYLIST_OUT_06_30");
    }
    let in_path = save(&book, &dir, "IN.xlsx")?;

    let out_path = ScheduleProcessor::default().run_constant_flow(&in_path)?;
    let out_book = load(&out_path)?;
    let constant = out_book
        .get_sheet_by_name("constant")
        .expect("constant sheet present");

    assert_eq!(constant.get_value((2, 1)).trim(), "Matinal");
    assert_eq!(constant.get_value((4, 1)).trim(), "pub_start   #COLOR 3");
    assert_eq!(constant.get_value((2, 4)).trim(), "ID CUB_PUB_TEST");
    assert_eq!(constant.get_value((3, 5)).trim(), "Spot 2");
    Ok(())
}

#[test]
fn test_time_round_trip_full_day() {
    for s in 0..86_400u32 {
        assert_eq!(parse_time_str(&format_time(s)), Some(s));
    }
}
