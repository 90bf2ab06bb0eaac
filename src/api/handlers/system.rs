//! System endpoints: health check, sweep settings.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::app_state::AppState;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
struct HealthResponse {
    status: String,
    timestamp: String,
    version: String,
}

/// `GET /health`: Service health status.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    description = "Returns service health status, version, and current timestamp.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

/// Effective sweep settings.
#[derive(Debug, Serialize, ToSchema)]
struct SweepSettings {
    concurrency: usize,
    batch_limit: i64,
    admin_enabled: bool,
}

/// `GET /config/sweep`: Effective sweep settings.
#[utoipa::path(
    get,
    path = "/config/sweep",
    tag = "System",
    summary = "Sweep settings",
    description = "Returns the worker pool size, per-phase batch limit, and whether the admin trigger accepts calls.",
    responses(
        (status = 200, description = "Sweep settings", body = SweepSettings),
    )
)]
pub async fn sweep_settings_handler(State(state): State<AppState>) -> impl IntoResponse {
    let options = state.sweep_runner.options();
    (
        StatusCode::OK,
        Json(SweepSettings {
            concurrency: options.concurrency,
            batch_limit: options.batch_limit,
            admin_enabled: state.sweep_secret.is_some(),
        }),
    )
}

/// System routes mounted at the root level.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_handler))
        .route("/config/sweep", get(sweep_settings_handler))
}
