use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, Url};
use serde::Deserialize;
use std::time::Duration;

use super::{HOLIDAY_MESSAGE, HolidayLookup, HolidayStatus, LookupError};
use crate::calendar::format_lookup_date;

#[derive(Debug, Clone)]
pub struct HttpLookupConfig {
    /// Endpoint receiving `?date=YYYY/MM/DD`.
    pub base_url: String,
    pub holiday_message: String,
    pub request_timeout: Duration,
    pub retries: u32,
    /// Delay before the first retry, doubled on each further attempt.
    pub retry_backoff: Duration,
}

impl HttpLookupConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            holiday_message: HOLIDAY_MESSAGE.to_string(),
            request_timeout: Duration::from_secs(10),
            retries: 2,
            retry_backoff: Duration::from_millis(200),
        }
    }

    #[must_use]
    pub fn with_holiday_message(mut self, message: impl Into<String>) -> Self {
        self.holiday_message = message.into();
        self
    }

    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_retries(mut self, retries: u32, backoff: Duration) -> Self {
        self.retries = retries;
        self.retry_backoff = backoff;
        self
    }
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    message: Option<String>,
}

/// Holiday lookup over HTTP.
#[derive(Debug, Clone)]
pub struct HttpHolidayLookup {
    client: Client,
    base_url: Url,
    config: HttpLookupConfig,
}

impl HttpHolidayLookup {
    pub fn new(config: HttpLookupConfig) -> Result<Self, LookupError> {
        let base_url = Url::parse(&config.base_url).map_err(|err| LookupError::InvalidUrl {
            url: config.base_url.clone(),
            reason: err.to_string(),
        })?;
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|err| LookupError::InvalidUrl {
                url: config.base_url.clone(),
                reason: err.to_string(),
            })?;
        Ok(Self {
            client,
            base_url,
            config,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The date keeps its slashes; the service splits on them.
    pub fn request_url(&self, date: NaiveDate) -> Url {
        let mut url = self.base_url.clone();
        url.set_query(Some(&format!("date={}", format_lookup_date(date))));
        url
    }

    async fn lookup_once(&self, date: NaiveDate) -> Result<HolidayStatus, LookupError> {
        let url = self.request_url(date);
        tracing::debug!(%date, %url, "querying holiday service");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| transport_error(date, err))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status { date, status });
        }

        let body: LookupResponse = response.json().await.map_err(|err| {
            if err.is_timeout() {
                LookupError::Timeout { date }
            } else {
                LookupError::Malformed {
                    date,
                    reason: err.to_string(),
                }
            }
        })?;
        let message = body.message.ok_or(LookupError::MissingMessage { date })?;
        Ok(HolidayStatus::from_message(message, &self.config.holiday_message))
    }
}

fn transport_error(date: NaiveDate, err: reqwest::Error) -> LookupError {
    if err.is_timeout() {
        LookupError::Timeout { date }
    } else {
        LookupError::Transport { date, source: err }
    }
}

#[async_trait]
impl HolidayLookup for HttpHolidayLookup {
    async fn lookup(&self, date: NaiveDate) -> Result<HolidayStatus, LookupError> {
        let mut attempt = 0;
        let mut backoff = self.config.retry_backoff;
        loop {
            match self.lookup_once(date).await {
                Ok(status) => return Ok(status),
                Err(err) if err.is_transient() && attempt < self.config.retries => {
                    attempt += 1;
                    tracing::warn!(
                        %date,
                        attempt,
                        retries = self.config.retries,
                        "holiday lookup failed, retrying: {err}"
                    );
                    tokio::time::sleep(backoff).await;
                    backoff = backoff.saturating_mul(2);
                }
                Err(err) => return Err(err),
            }
        }
    }

    fn name(&self) -> &str {
        "HttpHolidayLookup"
    }
}
