use super::{CalendarStore, StoreError, StoreResult};
use crate::category::{Category, CategoryRecord};
use crate::entry::{DayEntry, NewDayEntry};
use chrono::NaiveDate;
use parking_lot::RwLock;
use std::collections::BTreeMap;

#[derive(Debug, Default)]
struct MemoryState {
    categories: Vec<CategoryRecord>,
    entries: BTreeMap<NaiveDate, DayEntry>,
    next_entry_id: i64,
}

/// Store kept entirely in process memory.
#[derive(Debug, Default)]
pub struct MemoryCalendarStore {
    state: RwLock<MemoryState>,
}

impl MemoryCalendarStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.state.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn categories(&self) -> Vec<CategoryRecord> {
        self.state.read().categories.clone()
    }
}

impl CalendarStore for MemoryCalendarStore {
    fn find_category(&self, category: Category) -> StoreResult<Option<CategoryRecord>> {
        let state = self.state.read();
        Ok(state.categories.iter().copied().find(|c| c.is(category)))
    }

    fn ensure_category(&self, category: Category) -> StoreResult<CategoryRecord> {
        let mut state = self.state.write();
        if let Some(existing) = state.categories.iter().copied().find(|c| c.is(category)) {
            return Ok(existing);
        }
        let record = CategoryRecord::new(state.categories.len() as i64 + 1, category);
        state.categories.push(record);
        Ok(record)
    }

    fn exists_between(&self, start: NaiveDate, end: NaiveDate) -> StoreResult<bool> {
        if start > end {
            return Ok(false);
        }
        Ok(self.state.read().entries.range(start..=end).next().is_some())
    }

    fn find_between(&self, start: NaiveDate, end: NaiveDate) -> StoreResult<Vec<DayEntry>> {
        if start > end {
            return Ok(Vec::new());
        }
        let state = self.state.read();
        Ok(state
            .entries
            .range(start..=end)
            .map(|(_, entry)| entry.clone())
            .collect())
    }

    fn save_entries(&self, entries: &[NewDayEntry]) -> StoreResult<usize> {
        super::ensure_unique_dates(entries)?;
        let mut state = self.state.write();
        if let Some(taken) = entries.iter().find(|e| state.entries.contains_key(&e.date)) {
            return Err(StoreError::DuplicateDate(taken.date));
        }
        for entry in entries {
            if !state.categories.contains(&entry.category) {
                return Err(StoreError::InvalidData(format!(
                    "unknown category id {} for {}",
                    entry.category.id, entry.date
                )));
            }
        }
        for entry in entries {
            state.next_entry_id += 1;
            let id = state.next_entry_id;
            state.entries.insert(entry.date, entry.clone().into_entry(id));
        }
        Ok(entries.len())
    }
}
