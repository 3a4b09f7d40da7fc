use crate::entry::DayEntry;
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid data: {0}")]
    InvalidData(String),
}

pub type ExportResult<T> = Result<T, ExportError>;

#[derive(Serialize, Deserialize)]
struct CalendarSnapshot {
    year: Option<i32>,
    entries: Vec<DayEntry>,
}

impl CalendarSnapshot {
    fn from_entries(entries: &[DayEntry]) -> Self {
        let year = entries.first().map(|entry| entry.date.year());
        Self {
            year,
            entries: entries.to_vec(),
        }
    }

    fn into_entries(self) -> ExportResult<Vec<DayEntry>> {
        for pair in self.entries.windows(2) {
            if pair[0].date >= pair[1].date {
                return Err(ExportError::InvalidData(format!(
                    "entries out of order at {}",
                    pair[1].date
                )));
            }
        }
        if let Some(year) = self.year {
            if let Some(stray) = self.entries.iter().find(|e| e.date.year() != year) {
                return Err(ExportError::InvalidData(format!(
                    "entry {} does not belong to year {year}",
                    stray.date
                )));
            }
        }
        Ok(self.entries)
    }
}

pub fn save_entries_to_json<P: AsRef<Path>>(entries: &[DayEntry], path: P) -> ExportResult<()> {
    let snapshot = CalendarSnapshot::from_entries(entries);
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, &snapshot)?;
    Ok(())
}

pub fn load_entries_from_json<P: AsRef<Path>>(path: P) -> ExportResult<Vec<DayEntry>> {
    let file = File::open(path)?;
    let snapshot: CalendarSnapshot = serde_json::from_reader(file)?;
    snapshot.into_entries()
}

#[derive(Debug, Serialize)]
struct DayCsvRecord {
    date: String,
    weekday: String,
    category: String,
    description: String,
}

impl From<&DayEntry> for DayCsvRecord {
    fn from(entry: &DayEntry) -> Self {
        Self {
            date: entry.date.format("%Y-%m-%d").to_string(),
            weekday: entry.date.weekday().to_string(),
            category: entry.category.name.as_str().to_string(),
            description: entry.description.clone().unwrap_or_default(),
        }
    }
}

pub fn save_entries_to_csv<P: AsRef<Path>>(entries: &[DayEntry], path: P) -> ExportResult<()> {
    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);
    for entry in entries {
        writer.serialize(DayCsvRecord::from(entry))?;
    }
    writer.flush()?;
    Ok(())
}
