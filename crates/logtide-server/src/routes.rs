//! Route configuration for the logtide API.

use std::sync::Arc;

use axum::routing::{get, Router};
use tower_http::trace::TraceLayer;

use crate::handlers::{get_logs, health_check, ingest_log};
use crate::state::AppState;

/// Create the API router.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/logs", get(get_logs).post(ingest_log))
        .route("/health", get(health_check))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
