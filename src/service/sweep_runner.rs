//! Batch driver for closed-window selection.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures_util::StreamExt;
use futures_util::stream;
use tracing::instrument;

use super::{CandidateSelector, PropagationEngine, WindowScheduler, WinnerNotifier};
use crate::domain::{Event, EventOutcome, SelectionState, SweepReport};
use crate::error::SweepError;
use crate::persistence::SweepStore;

/// Tuning knobs for one sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepOptions {
    /// Events processed concurrently. Values below 1 are treated as 1.
    pub concurrency: usize,
    /// Rows fetched per listing page. Values below 1 are treated as 1.
    pub batch_limit: i64,
}

impl Default for SweepOptions {
    fn default() -> Self {
        Self {
            concurrency: 4,
            batch_limit: 500,
        }
    }
}

/// Finds events whose voting window closed without a selection and
/// drives each one through selection, propagation, and notification.
#[derive(Debug, Clone)]
pub struct SweepRunner {
    store: Arc<dyn SweepStore>,
    scheduler: WindowScheduler,
    selector: CandidateSelector,
    propagation: PropagationEngine,
    notifier: WinnerNotifier,
    options: SweepOptions,
}

impl SweepRunner {
    /// Builds a runner and its components over one shared store.
    #[must_use]
    pub fn new(store: Arc<dyn SweepStore>, options: SweepOptions) -> Self {
        Self {
            scheduler: WindowScheduler::new(Arc::clone(&store)),
            selector: CandidateSelector::new(Arc::clone(&store)),
            propagation: PropagationEngine::new(Arc::clone(&store)),
            notifier: WinnerNotifier::new(Arc::clone(&store)),
            store,
            options,
        }
    }

    /// Returns the sweep options.
    #[must_use]
    pub const fn options(&self) -> SweepOptions {
        self.options
    }

    /// Runs one sweep evaluated at `now`.
    ///
    /// Phases run in order, each paging through its listing by keyset
    /// until exhausted:
    ///
    /// 1. events without a voting window get one;
    /// 2. selected events missing their winner notification get it;
    /// 3. venues whose hero lags their latest selection are repaired;
    /// 4. every event whose window closed strictly before `now` and that
    ///    has no selection is processed independently.
    ///
    /// A per-event failure is recorded in the report and leaves that event
    /// for the next sweep, while the rest continue.
    ///
    /// # Errors
    ///
    /// Returns a [`SweepError`] only if a listing query fails. Work
    /// committed by earlier pages stays committed and later sweeps resume
    /// from storage state.
    #[instrument(skip(self), fields(concurrency = self.options.concurrency))]
    pub async fn run_sweep(&self, now: DateTime<Utc>) -> Result<SweepReport, SweepError> {
        let mut report = SweepReport::new(now);

        self.backfill_windows(&mut report).await?;
        self.recover_winner_effects(&mut report).await?;
        self.repair_venue_heroes(&mut report).await?;
        self.select_closed_events(now, &mut report).await?;

        report.finished_at = Utc::now();
        tracing::info!(
            selected = report.selected,
            unresolved = report.unresolved,
            skipped = report.skipped,
            failed = report.failures.len(),
            windows_assigned = report.windows_assigned,
            effects_recovered = report.effects_recovered,
            heroes_repaired = report.heroes_repaired,
            "sweep finished"
        );
        Ok(report)
    }

    /// Runs the selection pipeline for one event.
    ///
    /// The conditional selection write is the commit point: when it
    /// reports that another pass already selected this event, propagation
    /// and notification are skipped. After a commit both run even if the
    /// other fails, and any failure is returned.
    ///
    /// # Errors
    ///
    /// Returns a [`SweepError`] from whichever step failed. A failure
    /// before the commit leaves the event untouched; one after it is
    /// repaired by the recovery phases of a later sweep.
    pub async fn process_event(&self, event: &Event) -> Result<EventOutcome, SweepError> {
        let Some(winner) = self.selector.select_winner(event.id).await? else {
            tracing::info!(event_id = %event.id, "no eligible submissions");
            return Ok(EventOutcome::NoCandidates);
        };

        let photo_url = winner.photo_url.as_deref().ok_or_else(|| {
            SweepError::Internal(format!("winning submission {} has no photo", winner.id))
        })?;

        let committed = self
            .store
            .commit_selection(event.id, winner.id, photo_url)
            .await?;
        if !committed {
            tracing::warn!(event_id = %event.id, "selection already committed elsewhere");
            return Ok(EventOutcome::AlreadySelected);
        }
        tracing::info!(event_id = %event.id, submission_id = %winner.id, "selection committed");

        let propagated = self
            .propagation
            .maybe_propagate_hero(event.id, event.venue_id)
            .await;
        let notified = self.notifier.apply_winner_effects(event, &winner).await;

        match (propagated, notified) {
            (Ok(_), Ok(_)) => Ok(EventOutcome::Selected {
                submission: winner.id,
                recipient: winner.user_id,
            }),
            (Err(err), Ok(_)) | (Ok(_), Err(err)) => Err(err),
            (Err(hero), Err(notify)) => Err(SweepError::Internal(format!(
                "hero propagation failed: {hero}; winner notification failed: {notify}"
            ))),
        }
    }

    fn page_size(&self) -> i64 {
        self.options.batch_limit.max(1)
    }

    async fn backfill_windows(&self, report: &mut SweepReport) -> Result<(), SweepError> {
        let limit = self.page_size();
        let mut after = None;
        loop {
            let page = self.store.events_without_window(after, limit).await?;
            let full = is_full(page.len(), limit);
            after = page.last().map(|e| (e.event_date, e.id));

            for event in &page {
                match self.scheduler.assign_window_if_unset(event).await {
                    Ok(assignment) if assignment.written => report.windows_assigned += 1,
                    Ok(_) => {}
                    Err(err) => {
                        report.window_failures += 1;
                        tracing::error!(
                            event_id = %event.id,
                            error = %err,
                            "window assignment failed"
                        );
                    }
                }
            }

            if !full {
                return Ok(());
            }
        }
    }

    async fn recover_winner_effects(&self, report: &mut SweepReport) -> Result<(), SweepError> {
        let limit = self.page_size();
        let mut after = None;
        loop {
            let page = self
                .store
                .selected_events_without_notification(after, limit)
                .await?;
            let full = is_full(page.len(), limit);
            after = page.last().map(|e| e.id);

            let results: Vec<_> = stream::iter(page)
                .map(|event| async move {
                    let result = self.replay_winner_effects(&event).await;
                    (event.id, result)
                })
                .buffer_unordered(self.options.concurrency.max(1))
                .collect()
                .await;

            for (event_id, result) in results {
                match result {
                    Ok(true) => report.effects_recovered += 1,
                    Ok(false) => {}
                    Err(err) => {
                        tracing::error!(%event_id, error = %err, "winner effect recovery failed");
                        report.record_failure(event_id, err.to_string());
                    }
                }
            }

            if !full {
                return Ok(());
            }
        }
    }

    async fn replay_winner_effects(&self, event: &Event) -> Result<bool, SweepError> {
        let submission_id = event.selected_submission.ok_or_else(|| {
            SweepError::Internal(format!("event {} has no selection", event.id))
        })?;
        let winner = self
            .store
            .get_submission(submission_id)
            .await?
            .ok_or(SweepError::SubmissionNotFound(submission_id))?;
        self.notifier.apply_winner_effects(event, &winner).await
    }

    async fn repair_venue_heroes(&self, report: &mut SweepReport) -> Result<(), SweepError> {
        let limit = self.page_size();
        let mut after = None;
        loop {
            let page = self.store.stale_venue_heroes(after, limit).await?;
            let full = is_full(page.len(), limit);
            after = page.last().map(|(venue_id, _)| *venue_id);

            for (venue_id, event_id) in page {
                match self.propagation.maybe_propagate_hero(event_id, venue_id).await {
                    Ok(true) => report.heroes_repaired += 1,
                    Ok(false) => {}
                    Err(err) => {
                        tracing::error!(%event_id, %venue_id, error = %err, "hero repair failed");
                        report.record_failure(event_id, err.to_string());
                    }
                }
            }

            if !full {
                return Ok(());
            }
        }
    }

    async fn select_closed_events(
        &self,
        now: DateTime<Utc>,
        report: &mut SweepReport,
    ) -> Result<(), SweepError> {
        let limit = self.page_size();
        let mut after = None;
        loop {
            let mut page = self
                .store
                .closed_unselected_events(now, after, limit)
                .await?;
            let full = is_full(page.len(), limit);
            after = page
                .last()
                .and_then(|e| e.voting_closes_at.map(|closes_at| (closes_at, e.id)));

            page.retain(|event| {
                let state = event.state_at(now);
                if state != SelectionState::ClosedUnselected {
                    tracing::warn!(event_id = %event.id, ?state, "store returned ineligible event");
                }
                state == SelectionState::ClosedUnselected
            });
            tracing::debug!(events = page.len(), "processing closed events");

            let results: Vec<_> = stream::iter(page)
                .map(|event| async move {
                    let result = self.process_event(&event).await;
                    (event.id, result)
                })
                .buffer_unordered(self.options.concurrency.max(1))
                .collect()
                .await;

            for (event_id, result) in results {
                if let Err(err) = &result {
                    tracing::error!(%event_id, error = %err, "event processing failed");
                }
                report.record(event_id, result.map_err(|e| e.to_string()));
            }

            if !full || after.is_none() {
                return Ok(());
            }
        }
    }
}

fn is_full(page_len: usize, limit: i64) -> bool {
    i64::try_from(page_len).is_ok_and(|len| len >= limit)
}
