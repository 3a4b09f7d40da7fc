//! Runtime configuration read from `CALENDAR_TOOL_*` environment variables.

use serde::Deserialize;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

use crate::generator::DEFAULT_LOOKUP_CONCURRENCY;
use crate::lookup::{HOLIDAY_MESSAGE, HttpLookupConfig};

pub const ENV_HTTP_ADDR: &str = "CALENDAR_TOOL_HTTP_ADDR";
pub const ENV_DATABASE: &str = "CALENDAR_TOOL_DATABASE";
pub const ENV_HOLIDAY_API_URL: &str = "CALENDAR_TOOL_HOLIDAY_API_URL";
pub const ENV_HOLIDAY_MESSAGE: &str = "CALENDAR_TOOL_HOLIDAY_MESSAGE";
pub const ENV_LOOKUP_TIMEOUT_SECS: &str = "CALENDAR_TOOL_LOOKUP_TIMEOUT_SECS";
pub const ENV_LOOKUP_CONCURRENCY: &str = "CALENDAR_TOOL_LOOKUP_CONCURRENCY";
pub const ENV_LOOKUP_RETRIES: &str = "CALENDAR_TOOL_LOOKUP_RETRIES";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required setting {0}")]
    Missing(&'static str),

    #[error("invalid value '{value}' for {key}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_http_addr")]
    pub http_addr: String,

    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// No default: the holiday service location is deployment specific.
    #[serde(default)]
    pub holiday_api_url: Option<String>,

    #[serde(default = "default_holiday_message")]
    pub holiday_message: String,

    #[serde(default = "default_lookup_timeout_secs")]
    pub lookup_timeout_secs: u64,

    #[serde(default = "default_lookup_concurrency")]
    pub lookup_concurrency: usize,

    #[serde(default = "default_lookup_retries")]
    pub lookup_retries: u32,
}

fn default_http_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_database_path() -> String {
    "calendar.db".to_string()
}

fn default_holiday_message() -> String {
    HOLIDAY_MESSAGE.to_string()
}

fn default_lookup_timeout_secs() -> u64 {
    10
}

fn default_lookup_concurrency() -> usize {
    DEFAULT_LOOKUP_CONCURRENCY
}

fn default_lookup_retries() -> u32 {
    2
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            http_addr: default_http_addr(),
            database_path: default_database_path(),
            holiday_api_url: None,
            holiday_message: default_holiday_message(),
            lookup_timeout_secs: default_lookup_timeout_secs(),
            lookup_concurrency: default_lookup_concurrency(),
            lookup_retries: default_lookup_retries(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key-value source; blank values count as unset.
    pub fn from_lookup<F>(source: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| source(key).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        Ok(Self {
            http_addr: get(ENV_HTTP_ADDR).unwrap_or(defaults.http_addr),
            database_path: get(ENV_DATABASE).unwrap_or(defaults.database_path),
            holiday_api_url: get(ENV_HOLIDAY_API_URL),
            holiday_message: get(ENV_HOLIDAY_MESSAGE).unwrap_or(defaults.holiday_message),
            lookup_timeout_secs: parse_or(
                ENV_LOOKUP_TIMEOUT_SECS,
                get(ENV_LOOKUP_TIMEOUT_SECS),
                defaults.lookup_timeout_secs,
            )?,
            lookup_concurrency: parse_or(
                ENV_LOOKUP_CONCURRENCY,
                get(ENV_LOOKUP_CONCURRENCY),
                defaults.lookup_concurrency,
            )?,
            lookup_retries: parse_or(
                ENV_LOOKUP_RETRIES,
                get(ENV_LOOKUP_RETRIES),
                defaults.lookup_retries,
            )?,
        })
    }

    pub fn lookup_config(&self) -> Result<HttpLookupConfig, ConfigError> {
        let url = self
            .holiday_api_url
            .as_deref()
            .ok_or(ConfigError::Missing(ENV_HOLIDAY_API_URL))?;
        Ok(HttpLookupConfig::new(url)
            .with_holiday_message(self.holiday_message.clone())
            .with_request_timeout(Duration::from_secs(self.lookup_timeout_secs))
            .with_retries(self.lookup_retries, Duration::from_millis(200)))
    }
}

fn parse_or<T: FromStr>(
    key: &'static str,
    value: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        None => Ok(default),
        Some(raw) => match raw.trim().parse() {
            Ok(parsed) => Ok(parsed),
            Err(_) => Err(ConfigError::Invalid { key, value: raw }),
        },
    }
}
