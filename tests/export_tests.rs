mod common;

use std::fs;
use std::sync::Arc;

use calendar_tool::{
    CalendarGenerator, CalendarQuery, DayEntry, ExportError, MemoryCalendarStore,
    StaticHolidayLookup, load_entries_from_json, save_entries_to_csv, save_entries_to_json,
};
use common::d;
use tempfile::tempdir;

async fn generated(year: i32) -> Vec<DayEntry> {
    let store = Arc::new(MemoryCalendarStore::new());
    let lookup = StaticHolidayLookup::new()
        .with_holiday(d(2024, 1, 1))
        .with_labelled_holiday(d(2024, 12, 25), "Navidad, festivo");
    let generator = CalendarGenerator::new(store.clone(), Arc::new(lookup));
    generator.generate(year).await.unwrap();
    CalendarQuery::new(store).list_by_year(year).unwrap()
}

#[tokio::test]
async fn json_export_loads_back_identically() {
    let entries = generated(2024).await;
    let dir = tempdir().unwrap();
    let path = dir.path().join("2024.json");

    save_entries_to_json(&entries, &path).unwrap();
    let loaded = load_entries_from_json(&path).unwrap();
    assert_eq!(loaded, entries);

    let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw["year"], 2024);
    assert_eq!(raw["entries"].as_array().unwrap().len(), 366);
}

#[tokio::test]
async fn csv_export_has_one_row_per_day() {
    let entries = generated(2024).await;
    let dir = tempdir().unwrap();
    let path = dir.path().join("2024.csv");
    save_entries_to_csv(&entries, &path).unwrap();

    let mut reader = csv::Reader::from_path(&path).unwrap();
    assert_eq!(
        reader.headers().unwrap().iter().collect::<Vec<_>>(),
        vec!["date", "weekday", "category", "description"]
    );
    let rows: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
    assert_eq!(rows.len(), 366);
    assert_eq!(&rows[0][0], "2024-01-01");
    assert_eq!(&rows[0][1], "Mon");
    assert_eq!(&rows[0][2], "HOLIDAY");
    assert_eq!(&rows[0][3], "Es Festivo");
    assert_eq!(&rows[1][2], "WORKDAY");
    assert_eq!(&rows[1][3], "");

    let christmas = rows.iter().find(|r| &r[0] == "2024-12-25").unwrap();
    assert_eq!(&christmas[3], "Navidad, festivo");
}

#[tokio::test]
async fn shuffled_snapshot_is_rejected() {
    let mut entries = generated(2024).await;
    entries.swap(0, 1);
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.json");
    save_entries_to_json(&entries, &path).unwrap();

    let err = load_entries_from_json(&path).unwrap_err();
    assert!(matches!(err, ExportError::InvalidData(_)), "{err}");
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempdir().unwrap();
    let err = load_entries_from_json(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, ExportError::Io(_)));
}

#[test]
fn empty_export_round_trips() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("empty.json");
    save_entries_to_json(&[], &path).unwrap();
    assert!(load_entries_from_json(&path).unwrap().is_empty());
}
