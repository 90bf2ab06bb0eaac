//! Sweep result DTOs.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{EventFailure, EventId, SweepReport};

/// A per-event failure in a sweep response.
#[derive(Debug, Serialize, ToSchema)]
pub struct EventFailureDto {
    /// Event that failed and stays eligible.
    pub event_id: EventId,
    /// Error message.
    pub message: String,
}

/// Response body for `POST /admin/sweep`.
#[derive(Debug, Serialize, ToSchema)]
pub struct SweepResponse {
    /// Events that received a winning photo in this pass.
    pub selected: u64,
    /// Closed events left without a winner (no eligible submissions).
    pub unresolved: u64,
    /// Events already selected by a concurrent pass.
    pub skipped: u64,
    /// Events that failed and will be retried by the next sweep.
    pub failed: u64,
    /// Selected events whose missing winner notification was written.
    pub effects_recovered: u64,
    /// Venues whose hero pointer was repaired.
    pub heroes_repaired: u64,
    /// Events that received a voting window during this pass.
    pub windows_assigned: u64,
    /// Events whose window assignment failed.
    pub window_failures: u64,
    /// Failure details.
    pub failures: Vec<EventFailureDto>,
    /// Instant the sweep evaluated windows against.
    pub started_at: DateTime<Utc>,
    /// Completion time.
    pub finished_at: DateTime<Utc>,
}

impl From<SweepReport> for SweepResponse {
    fn from(report: SweepReport) -> Self {
        Self {
            selected: report.selected,
            unresolved: report.unresolved,
            skipped: report.skipped,
            failed: report.failures.len() as u64,
            effects_recovered: report.effects_recovered,
            heroes_repaired: report.heroes_repaired,
            windows_assigned: report.windows_assigned,
            window_failures: report.window_failures,
            failures: report
                .failures
                .into_iter()
                .map(|EventFailure { event_id, message }| EventFailureDto { event_id, message })
                .collect(),
            started_at: report.started_at,
            finished_at: report.finished_at,
        }
    }
}
