//! Year-level calendar generation.
//!
//! A year is generated at most once: the existence check, the per-day
//! holiday lookups and the batch write all run under a per-year lock, and
//! nothing is written unless every day of the year was classified.

use chrono::NaiveDate;
use futures::{StreamExt, TryStreamExt};
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Instant;

use crate::calendar::{YearSpan, classify_day};
use crate::category::CategorySet;
use crate::entry::NewDayEntry;
use crate::error::CalendarResult;
use crate::lookup::{HolidayLookup, HolidayStatus, LookupError};
use crate::persistence::{CalendarStore, StoreError, StoreResult};

pub const DEFAULT_LOOKUP_CONCURRENCY: usize = 8;

pub struct CalendarGenerator {
    store: Arc<dyn CalendarStore>,
    lookup: Arc<dyn HolidayLookup>,
    concurrency: usize,
    year_locks: Mutex<HashMap<i32, Arc<tokio::sync::Mutex<()>>>>,
}

impl CalendarGenerator {
    pub fn new(store: Arc<dyn CalendarStore>, lookup: Arc<dyn HolidayLookup>) -> Self {
        Self {
            store,
            lookup,
            concurrency: DEFAULT_LOOKUP_CONCURRENCY,
            year_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Maximum number of lookups in flight; zero is treated as one.
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn ensure_categories(&self) -> StoreResult<CategorySet> {
        self.store.ensure_categories()
    }

    /// Returns `Ok(false)` when the year already has entries.
    pub async fn generate(&self, year: i32) -> CalendarResult<bool> {
        let span = YearSpan::new(year)?;
        let lock = self.year_lock(year);
        let _guard = lock.lock().await;

        if self.store.exists_between(span.start(), span.end())? {
            tracing::info!(year, "calendar already generated, skipping");
            return Ok(false);
        }

        let categories = self.store.ensure_categories()?;
        let started = Instant::now();
        tracing::info!(
            year,
            days = span.len(),
            lookup = self.lookup.name(),
            concurrency = self.concurrency,
            "generating calendar"
        );

        let statuses = self.lookup_year(&span).await?;
        let entries = classify_year(&statuses, &categories);

        match self.store.save_entries(&entries) {
            Ok(written) => {
                tracing::info!(
                    year,
                    written,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "calendar generated"
                );
                Ok(true)
            }
            Err(StoreError::DuplicateDate(date)) => {
                tracing::warn!(year, %date, "calendar written concurrently, batch discarded");
                Ok(false)
            }
            Err(err) => Err(err.into()),
        }
    }

    fn year_lock(&self, year: i32) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.year_locks.lock();
        locks.entry(year).or_default().clone()
    }

    /// Looks up every day of the year; the first failure cancels the rest.
    async fn lookup_year(
        &self,
        span: &YearSpan,
    ) -> Result<BTreeMap<NaiveDate, HolidayStatus>, LookupError> {
        let lookup = self.lookup.as_ref();
        futures::stream::iter(span.days())
            .map(|date| async move {
                let status = lookup.lookup(date).await?;
                Ok::<_, LookupError>((date, status))
            })
            .buffer_unordered(self.concurrency)
            .try_collect()
            .await
    }
}

/// Turns per-day lookup results into store rows, ascending by date.
pub fn classify_year(
    statuses: &BTreeMap<NaiveDate, HolidayStatus>,
    categories: &CategorySet,
) -> Vec<NewDayEntry> {
    statuses
        .iter()
        .map(|(date, status)| {
            let (category, description) = classify_day(*date, status);
            NewDayEntry::new(*date, categories.record(category), description)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::{Category, CategoryRecord};

    fn categories() -> CategorySet {
        CategorySet {
            workday: CategoryRecord::new(1, Category::Workday),
            weekend: CategoryRecord::new(2, Category::Weekend),
            holiday: CategoryRecord::new(3, Category::Holiday),
        }
    }

    #[test]
    fn classify_year_orders_by_date_and_links_categories() {
        let mut statuses = BTreeMap::new();
        let sat = NaiveDate::from_ymd_opt(2024, 7, 6).unwrap();
        let mon = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let tue = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        statuses.insert(sat, HolidayStatus::new(false, "No es Festivo"));
        statuses.insert(tue, HolidayStatus::new(false, "No es Festivo"));
        statuses.insert(mon, HolidayStatus::new(true, "Es Festivo"));

        let entries = classify_year(&statuses, &categories());
        let dates: Vec<_> = entries.iter().map(|e| e.date).collect();
        assert_eq!(dates, vec![mon, tue, sat]);
        assert_eq!(entries[0].category.id, 3);
        assert_eq!(entries[0].description.as_deref(), Some("Es Festivo"));
        assert_eq!(entries[1].category.id, 1);
        assert_eq!(entries[2].category.id, 2);
        assert_eq!(entries[2].description, None);
    }
}
