use std::sync::Arc;

use crate::calendar::YearSpan;
use crate::category::Category;
use crate::entry::DayEntry;
use crate::error::CalendarResult;
use crate::persistence::CalendarStore;

/// Read-only access to generated years.
#[derive(Clone)]
pub struct CalendarQuery {
    store: Arc<dyn CalendarStore>,
}

impl CalendarQuery {
    pub fn new(store: Arc<dyn CalendarStore>) -> Self {
        Self { store }
    }

    /// Empty when the year was never generated.
    pub fn list_by_year(&self, year: i32) -> CalendarResult<Vec<DayEntry>> {
        let span = YearSpan::new(year)?;
        Ok(self.store.find_between(span.start(), span.end())?)
    }

    pub fn list_holidays_by_year(&self, year: i32) -> CalendarResult<Vec<DayEntry>> {
        let entries = self.list_by_year(year)?;
        Ok(holidays_only(entries))
    }

    pub fn is_generated(&self, year: i32) -> CalendarResult<bool> {
        let span = YearSpan::new(year)?;
        Ok(self.store.exists_between(span.start(), span.end())?)
    }
}

pub fn holidays_only(entries: Vec<DayEntry>) -> Vec<DayEntry> {
    entries
        .into_iter()
        .filter(|entry| {
            entry
                .category
                .name
                .as_str()
                .eq_ignore_ascii_case(Category::Holiday.as_str())
        })
        .collect()
}
