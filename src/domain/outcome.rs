//! Per-event outcomes and the aggregated sweep report.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{EventId, SubmissionId, UserId};

/// Result of running the selection pipeline for one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum EventOutcome {
    /// This pass committed a winner and applied its side effects.
    Selected {
        /// Winning submission.
        submission: SubmissionId,
        /// Owner of the winning submission.
        recipient: UserId,
    },
    /// No eligible submissions. The event stays closed and unselected.
    NoCandidates,
    /// Another pass committed a selection first; side effects skipped.
    AlreadySelected,
}

/// A per-event failure recorded during a sweep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventFailure {
    /// Event that failed.
    pub event_id: EventId,
    /// Rendered error message.
    pub message: String,
}

/// Aggregated result of one sweep invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    /// Instant the sweep evaluated windows against.
    pub started_at: DateTime<Utc>,
    /// Wall-clock completion time.
    pub finished_at: DateTime<Utc>,
    /// Events that received voting-close timestamps during backfill.
    pub windows_assigned: u64,
    /// Backfill failures. Those events are retried next sweep.
    pub window_failures: u64,
    /// Events that got a winner in this pass.
    pub selected: u64,
    /// Events left closed without a winner.
    pub unresolved: u64,
    /// Events whose selection was committed concurrently by another pass.
    pub skipped: u64,
    /// Selected events whose missing winner notification was written.
    pub effects_recovered: u64,
    /// Venues whose hero was moved back onto their latest selection.
    pub heroes_repaired: u64,
    /// Events that failed. Each is retried by the next sweep.
    pub failures: Vec<EventFailure>,
}

impl SweepReport {
    /// Creates an empty report for a sweep evaluated at `now`.
    #[must_use]
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            started_at: now,
            finished_at: now,
            windows_assigned: 0,
            window_failures: 0,
            selected: 0,
            unresolved: 0,
            skipped: 0,
            effects_recovered: 0,
            heroes_repaired: 0,
            failures: Vec::new(),
        }
    }

    /// Folds one event's pipeline result into the counters.
    pub fn record(&mut self, event_id: EventId, result: Result<EventOutcome, String>) {
        match result {
            Ok(EventOutcome::Selected { .. }) => self.selected += 1,
            Ok(EventOutcome::NoCandidates) => self.unresolved += 1,
            Ok(EventOutcome::AlreadySelected) => self.skipped += 1,
            Err(message) => self.record_failure(event_id, message),
        }
    }

    /// Adds a failure for an event outside the selection pipeline.
    pub fn record_failure(&mut self, event_id: EventId, message: String) {
        self.failures.push(EventFailure { event_id, message });
    }

    /// Number of events that received a selection in this pass.
    #[must_use]
    pub const fn processed_count(&self) -> u64 {
        self.selected
    }

    /// Number of events that ended this pass without a selection,
    /// whether through failure or for lack of candidates.
    #[must_use]
    pub fn error_count(&self) -> u64 {
        self.unresolved + self.failures.len() as u64
    }
}
