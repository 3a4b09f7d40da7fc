use chrono::NaiveDate;
use thiserror::Error;

use crate::category::{Category, CategoryRecord, CategorySet};
use crate::entry::{DayEntry, NewDayEntry};

#[derive(Debug, Error)]
pub enum StoreError {
    #[cfg(feature = "sqlite")]
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("a day entry for {0} already exists")]
    DuplicateDate(NaiveDate),

    #[error("invalid data: {0}")]
    InvalidData(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Durable day-entry storage keyed by date.
pub trait CalendarStore: Send + Sync {
    fn find_category(&self, category: Category) -> StoreResult<Option<CategoryRecord>>;

    /// Find-or-create; never yields two rows for one name.
    fn ensure_category(&self, category: Category) -> StoreResult<CategoryRecord>;

    fn exists_between(&self, start: NaiveDate, end: NaiveDate) -> StoreResult<bool>;

    /// Entries with `start <= date <= end`, ascending by date.
    fn find_between(&self, start: NaiveDate, end: NaiveDate) -> StoreResult<Vec<DayEntry>>;

    /// Writes all entries or none of them.
    fn save_entries(&self, entries: &[NewDayEntry]) -> StoreResult<usize>;

    fn ensure_categories(&self) -> StoreResult<CategorySet> {
        Ok(CategorySet {
            workday: self.ensure_category(Category::Workday)?,
            weekend: self.ensure_category(Category::Weekend)?,
            holiday: self.ensure_category(Category::Holiday)?,
        })
    }
}

pub(crate) fn ensure_unique_dates(entries: &[NewDayEntry]) -> StoreResult<()> {
    let mut seen = std::collections::HashSet::with_capacity(entries.len());
    for entry in entries {
        if !seen.insert(entry.date) {
            return Err(StoreError::DuplicateDate(entry.date));
        }
    }
    Ok(())
}

pub mod file;
pub mod memory;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use file::{ExportError, load_entries_from_json, save_entries_to_csv, save_entries_to_json};
pub use memory::MemoryCalendarStore;
