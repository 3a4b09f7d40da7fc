//! Holiday lookup against an external service.
//!
//! The service answers one date at a time with `{"message": "..."}`; a date
//! is a holiday when the message matches the configured sentinel.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use thiserror::Error;

pub mod http;

pub use http::{HttpHolidayLookup, HttpLookupConfig};

/// Message the upstream returns for a holiday.
pub const HOLIDAY_MESSAGE: &str = "Es Festivo";
/// Message the upstream returns for any other date.
pub const NOT_HOLIDAY_MESSAGE: &str = "No es Festivo";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HolidayStatus {
    pub is_holiday: bool,
    pub label: String,
}

impl HolidayStatus {
    pub fn new(is_holiday: bool, label: impl Into<String>) -> Self {
        Self {
            is_holiday,
            label: label.into(),
        }
    }

    /// Interprets an upstream message against the holiday sentinel.
    pub fn from_message(message: impl Into<String>, sentinel: &str) -> Self {
        let label = message.into();
        let is_holiday = label.trim().to_lowercase() == sentinel.trim().to_lowercase();
        Self { is_holiday, label }
    }
}

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("request for {date} failed: {source}")]
    Transport {
        date: NaiveDate,
        #[source]
        source: reqwest::Error,
    },

    #[error("request for {date} timed out")]
    Timeout { date: NaiveDate },

    #[error("holiday service answered {status} for {date}")]
    Status {
        date: NaiveDate,
        status: reqwest::StatusCode,
    },

    #[error("malformed response for {date}: {reason}")]
    Malformed { date: NaiveDate, reason: String },

    #[error("response for {date} has no `message` field")]
    MissingMessage { date: NaiveDate },

    #[error("invalid holiday service url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

impl LookupError {
    /// Worth another attempt: network hiccups, timeouts and 5xx answers.
    pub fn is_transient(&self) -> bool {
        match self {
            LookupError::Transport { source, .. } => source.is_connect() || source.is_request(),
            LookupError::Timeout { .. } => true,
            LookupError::Status { status, .. } => status.is_server_error(),
            _ => false,
        }
    }
}

/// Answers "is this date a public holiday".
#[async_trait]
pub trait HolidayLookup: Send + Sync {
    async fn lookup(&self, date: NaiveDate) -> Result<HolidayStatus, LookupError>;

    /// Name used in logs.
    fn name(&self) -> &str {
        "HolidayLookup"
    }
}

/// Fixed holiday table, for tests and offline runs.
#[derive(Debug, Clone, Default)]
pub struct StaticHolidayLookup {
    holidays: HashMap<NaiveDate, String>,
}

impl StaticHolidayLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_holiday(mut self, date: NaiveDate) -> Self {
        self.holidays.insert(date, HOLIDAY_MESSAGE.to_string());
        self
    }

    pub fn with_labelled_holiday(mut self, date: NaiveDate, label: impl Into<String>) -> Self {
        self.holidays.insert(date, label.into());
        self
    }

    pub fn holidays(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.holidays.keys().copied()
    }
}

impl FromIterator<NaiveDate> for StaticHolidayLookup {
    fn from_iter<I: IntoIterator<Item = NaiveDate>>(iter: I) -> Self {
        iter.into_iter().fold(Self::new(), Self::with_holiday)
    }
}

#[async_trait]
impl HolidayLookup for StaticHolidayLookup {
    async fn lookup(&self, date: NaiveDate) -> Result<HolidayStatus, LookupError> {
        Ok(match self.holidays.get(&date) {
            Some(label) => HolidayStatus::new(true, label.clone()),
            None => HolidayStatus::new(false, NOT_HOLIDAY_MESSAGE),
        })
    }

    fn name(&self) -> &str {
        "StaticHolidayLookup"
    }
}
