use std::{net::SocketAddr, sync::Arc};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::{CalendarError, CalendarGenerator, CalendarQuery, DayEntry};

#[derive(Clone)]
pub struct AppState {
    generator: Arc<CalendarGenerator>,
    query: CalendarQuery,
}

impl AppState {
    pub fn new(generator: CalendarGenerator, query: CalendarQuery) -> Self {
        Self {
            generator: Arc::new(generator),
            query,
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

#[derive(Debug)]
enum ApiError {
    NotFound(String),
    Invalid(String),
    Upstream(String),
    Internal(String),
}

impl ApiError {
    fn not_generated(year: i32) -> Self {
        ApiError::NotFound(format!("calendar not generated for year {year}"))
    }
}

impl From<CalendarError> for ApiError {
    fn from(value: CalendarError) -> Self {
        match value {
            CalendarError::InvalidYear { .. } => ApiError::Invalid(value.to_string()),
            CalendarError::UpstreamLookup(_) => {
                tracing::error!("generation aborted: {value}");
                ApiError::Upstream(value.to_string())
            }
            CalendarError::Persistence(_) => {
                tracing::error!("store failure: {value}");
                ApiError::Internal(value.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, "not_found", message),
            ApiError::Invalid(message) => (StatusCode::BAD_REQUEST, "invalid_request", message),
            ApiError::Upstream(message) => {
                (StatusCode::BAD_GATEWAY, "upstream_lookup_failed", message)
            }
            ApiError::Internal(message) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", message)
            }
        };
        (status, Json(ErrorBody { error, message })).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/calendar", get(home))
        .route(
            "/calendar/generate/:year",
            get(generate_calendar).post(generate_calendar),
        )
        .route("/calendar/list/:year", get(list_calendar))
        .route("/calendar/holidays/:year", get(list_holidays))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, state: AppState) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "calendar HTTP API listening");
    axum::serve(listener, app).await
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn home() -> &'static str {
    "Calendar API is up and running"
}

async fn generate_calendar(
    State(state): State<AppState>,
    Path(year): Path<i32>,
) -> Result<Json<bool>, ApiError> {
    let generated = state.generator.generate(year).await?;
    Ok(Json(generated))
}

async fn list_calendar(
    State(state): State<AppState>,
    Path(year): Path<i32>,
) -> Result<Json<Vec<DayEntry>>, ApiError> {
    let entries = state.query.list_by_year(year)?;
    if entries.is_empty() {
        return Err(ApiError::not_generated(year));
    }
    Ok(Json(entries))
}

async fn list_holidays(
    State(state): State<AppState>,
    Path(year): Path<i32>,
) -> Result<Json<Vec<DayEntry>>, ApiError> {
    let entries = state.query.list_by_year(year)?;
    if entries.is_empty() {
        return Err(ApiError::not_generated(year));
    }
    Ok(Json(crate::query::holidays_only(entries)))
}
