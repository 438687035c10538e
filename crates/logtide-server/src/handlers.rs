//! HTTP request handlers.

use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::Json;
use chrono::{DateTime, Utc};
use logtide_core::LogEntry;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::timestamp::{format_timestamp, parse_timestamp};

/// Body of `POST /logs`.
#[derive(Debug, Deserialize)]
pub struct IngestRequest {
    /// Service the message belongs to.
    pub service_name: Option<String>,
    /// ISO-8601 timestamp.
    pub timestamp: Option<String>,
    /// Message text.
    pub message: Option<String>,
}

/// Reply to a successful ingest.
#[derive(Debug, Serialize)]
pub struct IngestResponse {
    /// Status text.
    pub status: &'static str,
}

/// Query string of `GET /logs`.
#[derive(Debug, Deserialize)]
pub struct LogsQuery {
    /// Service to read.
    pub service: Option<String>,
    /// Inclusive lower bound, ISO-8601.
    pub start: Option<String>,
    /// Inclusive upper bound, ISO-8601.
    pub end: Option<String>,
}

/// One log entry as returned by `GET /logs`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    /// RFC 3339 timestamp in UTC.
    pub timestamp: String,
    /// Message text.
    pub message: String,
}

impl From<LogEntry> for LogRecord {
    fn from(entry: LogEntry) -> Self {
        Self {
            timestamp: format_timestamp(entry.timestamp),
            message: entry.message,
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Status message.
    pub status: &'static str,
    /// Number of services with stored entries.
    pub services: usize,
    /// Total stored entries.
    pub entries: usize,
    /// Server uptime in seconds.
    pub uptime_secs: u64,
}

fn require(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn parse_field(field: &'static str, raw: &str) -> ApiResult<DateTime<Utc>> {
    parse_timestamp(raw).ok_or_else(|| ApiError::InvalidTimestamp {
        field,
        value: raw.to_string(),
    })
}

/// Handle POST /logs - ingest one entry.
pub async fn ingest_log(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<IngestResponse>> {
    let Json(body) = payload.map_err(|e| ApiError::InvalidJson(e.body_text()))?;
    if body.as_object().is_some_and(serde_json::Map::is_empty) {
        return Err(ApiError::InvalidJson("empty payload".to_string()));
    }
    let req: IngestRequest =
        serde_json::from_value(body).map_err(|e| ApiError::InvalidJson(e.to_string()))?;

    let missing: Vec<&str> = [
        ("service_name", req.service_name.as_deref()),
        ("timestamp", req.timestamp.as_deref()),
        ("message", req.message.as_deref()),
    ]
    .into_iter()
    .filter(|(_, v)| require(*v).is_none())
    .map(|(name, _)| name)
    .collect();

    let (Some(service), Some(raw_ts), Some(message)) = (
        require(req.service_name.as_deref()),
        require(req.timestamp.as_deref()),
        req.message.filter(|m| !m.is_empty()),
    ) else {
        return Err(ApiError::MissingFields(missing.join(", ")));
    };

    let timestamp = parse_field("timestamp", raw_ts)?;
    state.store().append(service, timestamp, message)?;

    debug!(service, %timestamp, "ingested log entry");
    Ok(Json(IngestResponse {
        status: "Log ingested successfully",
    }))
}

/// Handle GET /logs - entries for one service within a time range.
pub async fn get_logs(
    State(state): State<Arc<AppState>>,
    query: Result<Query<LogsQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<LogRecord>>> {
    let Query(query) = query.map_err(|e| ApiError::InvalidQuery(e.body_text()))?;
    let (Some(service), Some(raw_start), Some(raw_end)) = (
        require(query.service.as_deref()),
        require(query.start.as_deref()),
        require(query.end.as_deref()),
    ) else {
        return Err(ApiError::MissingQueryParams);
    };

    let start = parse_field("start", raw_start)?;
    let end = parse_field("end", raw_end)?;

    let entries = state.store().range_query(service, start, end)?;
    debug!(service, %start, %end, returned = entries.len(), "served log query");

    Ok(Json(entries.into_iter().map(LogRecord::from).collect()))
}

/// Handle GET /health - liveness and store size.
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let stats = state.store().stats();
    Json(HealthResponse {
        status: "ok",
        services: stats.services,
        entries: stats.entries,
        uptime_secs: state.uptime_secs(),
    })
}
