pub mod calendar;
pub mod category;
pub mod config;
pub mod entry;
pub mod error;
pub mod generator;
#[cfg(feature = "http_api")]
pub mod http_api;
pub mod lookup;
pub mod persistence;
pub mod query;

pub use calendar::{YearSpan, classify_day, format_lookup_date};
pub use category::{Category, CategoryRecord, CategorySet};
pub use config::{AppConfig, ConfigError};
pub use entry::{DayEntry, NewDayEntry};
pub use error::{CalendarError, CalendarResult};
pub use generator::CalendarGenerator;
pub use lookup::{
    HolidayLookup, HolidayStatus, HttpHolidayLookup, HttpLookupConfig, LookupError,
    StaticHolidayLookup,
};
#[cfg(feature = "sqlite")]
pub use persistence::sqlite::SqliteCalendarStore;
pub use persistence::{
    CalendarStore, ExportError, MemoryCalendarStore, StoreError, load_entries_from_json,
    save_entries_to_csv, save_entries_to_json,
};
pub use query::CalendarQuery;
