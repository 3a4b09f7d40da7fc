use thiserror::Error;

use crate::lookup::LookupError;
use crate::persistence::StoreError;

/// Failures surfaced by generation and query operations.
#[derive(Debug, Error)]
pub enum CalendarError {
    #[error("year {year} is outside the supported range {min}..={max}")]
    InvalidYear { year: i32, min: i32, max: i32 },

    #[error("holiday lookup failed: {0}")]
    UpstreamLookup(#[from] LookupError),

    #[error("persistence failure: {0}")]
    Persistence(#[from] StoreError),
}

pub type CalendarResult<T> = Result<T, CalendarError>;
