//! Administrative sweep trigger.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;

use crate::api::auth::AdminAuth;
use crate::api::dto::SweepResponse;
use crate::app_state::AppState;
use crate::error::{ErrorResponse, SweepError};

/// `POST /admin/sweep`: Run a selection sweep now.
///
/// Also served on `GET` for schedulers that can only issue GET requests.
///
/// # Errors
///
/// Returns [`SweepError::Unauthorized`] without doing any work when the
/// bearer credential is missing or wrong, or a storage error when the
/// pending events cannot be listed.
#[utoipa::path(
    post,
    path = "/admin/sweep",
    tag = "Admin",
    summary = "Run a selection sweep",
    description = "Selects a winning photo for every event whose voting window has closed without a selection, propagates venue heroes, and notifies winners. Per-event failures are reported in the body and do not fail the call.",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Sweep completed", body = SweepResponse),
        (status = 401, description = "Missing or invalid bearer credential", body = ErrorResponse),
        (status = 500, description = "Pending events could not be listed", body = ErrorResponse),
    )
)]
pub async fn run_sweep(
    _auth: AdminAuth,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, SweepError> {
    let report = state.sweep_runner.run_sweep(Utc::now()).await?;
    Ok(Json(SweepResponse::from(report)))
}

/// Admin routes mounted at the root level.
pub fn routes() -> Router<AppState> {
    Router::new().route("/admin/sweep", get(run_sweep).post(run_sweep))
}
