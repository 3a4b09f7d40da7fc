#![allow(dead_code)]

use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    Json, Router,
    extract::{RawQuery, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use calendar_tool::{HolidayLookup, HolidayStatus, LookupError, StaticHolidayLookup};
use chrono::NaiveDate;
use parking_lot::Mutex;
use serde_json::json;

pub fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

/// How the stand-in holiday service answers particular dates.
#[derive(Debug, Default, Clone)]
pub struct FakeBehavior {
    pub holidays: HashSet<NaiveDate>,
    /// Always answer 500.
    pub failing: HashSet<NaiveDate>,
    /// Answer 503 once, then normally.
    pub flaky_once: HashSet<NaiveDate>,
    /// Answer `{}` without a message.
    pub silent: HashSet<NaiveDate>,
    /// Answer a body that is not JSON.
    pub garbled: HashSet<NaiveDate>,
    /// Sleep before answering.
    pub slow: HashSet<NaiveDate>,
}

impl FakeBehavior {
    pub fn with_holidays<I: IntoIterator<Item = NaiveDate>>(holidays: I) -> Self {
        Self {
            holidays: holidays.into_iter().collect(),
            ..Self::default()
        }
    }
}

struct FakeState {
    behavior: FakeBehavior,
    calls: AtomicUsize,
    already_failed: Mutex<HashSet<NaiveDate>>,
    raw_queries: Mutex<Vec<String>>,
}

#[derive(Clone)]
pub struct FakeHolidayService {
    pub url: String,
    state: Arc<FakeState>,
}

impl FakeHolidayService {
    pub fn calls(&self) -> usize {
        self.state.calls.load(Ordering::SeqCst)
    }

    pub fn raw_queries(&self) -> Vec<String> {
        self.state.raw_queries.lock().clone()
    }
}

async fn answer(State(state): State<Arc<FakeState>>, RawQuery(query): RawQuery) -> Response {
    state.calls.fetch_add(1, Ordering::SeqCst);
    let raw = query.unwrap_or_default();
    state.raw_queries.lock().push(raw.clone());

    let date = raw
        .strip_prefix("date=")
        .and_then(|value| NaiveDate::parse_from_str(value, "%Y/%m/%d").ok());
    let Some(date) = date else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "message": "Formato de fecha no válido o valores incorrectos" })),
        )
            .into_response();
    };

    let behavior = &state.behavior;
    if behavior.slow.contains(&date) {
        tokio::time::sleep(Duration::from_secs(2)).await;
    }
    if behavior.failing.contains(&date) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "message": "Error al consultar/calcular festivos" })),
        )
            .into_response();
    }
    if behavior.flaky_once.contains(&date) && state.already_failed.lock().insert(date) {
        return StatusCode::SERVICE_UNAVAILABLE.into_response();
    }
    if behavior.silent.contains(&date) {
        return Json(json!({})).into_response();
    }
    if behavior.garbled.contains(&date) {
        return "<html>oops</html>".into_response();
    }
    let message = if behavior.holidays.contains(&date) {
        "Es Festivo"
    } else {
        "No es Festivo"
    };
    Json(json!({ "message": message })).into_response()
}

/// Serves `/api/holidays` on an ephemeral local port.
pub async fn spawn_holiday_service(behavior: FakeBehavior) -> FakeHolidayService {
    let state = Arc::new(FakeState {
        behavior,
        calls: AtomicUsize::new(0),
        already_failed: Mutex::new(HashSet::new()),
        raw_queries: Mutex::new(Vec::new()),
    });
    let app = Router::new()
        .route("/api/holidays", get(answer))
        .with_state(state.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    FakeHolidayService {
        url: format!("http://{addr}/api/holidays"),
        state,
    }
}

/// Static lookup that counts calls and tracks peak concurrency.
pub struct CountingLookup {
    inner: StaticHolidayLookup,
    pub calls: AtomicUsize,
    in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
    delay: Option<Duration>,
}

impl CountingLookup {
    pub fn new(inner: StaticHolidayLookup) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            delay: None,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HolidayLookup for CountingLookup {
    async fn lookup(&self, date: NaiveDate) -> Result<HolidayStatus, LookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let result = self.inner.lookup(date).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

/// Fails for one date, answers from a static table otherwise.
pub struct FailingLookup {
    inner: StaticHolidayLookup,
    fail_on: NaiveDate,
}

impl FailingLookup {
    pub fn new(inner: StaticHolidayLookup, fail_on: NaiveDate) -> Self {
        Self { inner, fail_on }
    }
}

#[async_trait]
impl HolidayLookup for FailingLookup {
    async fn lookup(&self, date: NaiveDate) -> Result<HolidayStatus, LookupError> {
        if date == self.fail_on {
            return Err(LookupError::Timeout { date });
        }
        self.inner.lookup(date).await
    }
}
