use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::category::{Category, CategoryRecord};

/// One persisted calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayEntry {
    pub id: i64,
    pub date: NaiveDate,
    pub category: CategoryRecord,
    /// Upstream holiday message; only set for holidays.
    pub description: Option<String>,
}

impl DayEntry {
    pub fn is_holiday(&self) -> bool {
        self.category.is(Category::Holiday)
    }
}

/// A classified day waiting to be written by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDayEntry {
    pub date: NaiveDate,
    pub category: CategoryRecord,
    pub description: Option<String>,
}

impl NewDayEntry {
    pub fn new(date: NaiveDate, category: CategoryRecord, description: Option<String>) -> Self {
        Self {
            date,
            category,
            description,
        }
    }

    pub fn into_entry(self, id: i64) -> DayEntry {
        DayEntry {
            id,
            date: self.date,
            category: self.category,
            description: self.description,
        }
    }
}
