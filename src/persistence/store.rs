//! The storage handle injected into every engine component.

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use crate::domain::{Event, EventId, NewNotification, PhotoSubmission, SubmissionId, VenueId};
use crate::error::SweepError;

/// Keyset position in the window backfill listing: the last
/// `(event_date, id)` of the previous page.
pub type WindowCursor = (NaiveDate, EventId);

/// Keyset position in the closed-window listing: the last
/// `(voting_closes_at, id)` of the previous page.
pub type ClosedCursor = (DateTime<Utc>, EventId);

/// Read/write surface the sweep needs from the relational store.
///
/// Write-once fields are only ever set through the conditional methods
/// ([`assign_voting_close`](Self::assign_voting_close),
/// [`commit_selection`](Self::commit_selection)), which return `false`
/// when the field was already set and nothing was written.
///
/// Listings are paged by keyset: each takes the last key of the previous
/// page (or `None` for the first page) and returns rows strictly after it,
/// so rows that stay in a listing never hide the rows behind them.
#[async_trait]
pub trait SweepStore: Send + Sync + fmt::Debug {
    /// Events that have no voting-close timestamp yet, ordered by date
    /// then id.
    async fn events_without_window(
        &self,
        after: Option<WindowCursor>,
        limit: i64,
    ) -> Result<Vec<Event>, SweepError>;

    /// Sets `voting_closes_at` only if it is still null.
    async fn assign_voting_close(
        &self,
        event_id: EventId,
        closes_at: DateTime<Utc>,
    ) -> Result<bool, SweepError>;

    /// Fetches a single event.
    async fn get_event(&self, event_id: EventId) -> Result<Option<Event>, SweepError>;

    /// Events whose window closed strictly before `now` and that have no
    /// selection, ordered by close time then id.
    async fn closed_unselected_events(
        &self,
        now: DateTime<Utc>,
        after: Option<ClosedCursor>,
        limit: i64,
    ) -> Result<Vec<Event>, SweepError>;

    /// Submissions for an event that have a photo and are not hidden.
    async fn eligible_submissions(
        &self,
        event_id: EventId,
    ) -> Result<Vec<PhotoSubmission>, SweepError>;

    /// Fetches a single submission regardless of eligibility.
    async fn get_submission(
        &self,
        submission_id: SubmissionId,
    ) -> Result<Option<PhotoSubmission>, SweepError>;

    /// Sets the event's selection only if it is still null.
    ///
    /// This is the commit point of the pipeline: the caller runs side
    /// effects only when this returns `true`.
    async fn commit_selection(
        &self,
        event_id: EventId,
        submission_id: SubmissionId,
        photo_url: &str,
    ) -> Result<bool, SweepError>;

    /// The venue's event with the latest date among those that have a
    /// selection. Equal dates resolve to the larger id.
    async fn latest_selected_event(&self, venue_id: VenueId)
    -> Result<Option<EventId>, SweepError>;

    /// Points the venue's hero at `event_id` unless the current hero is a
    /// later event by `(event_date, id)`. Returns `false` when nothing was
    /// written, including when the venue does not exist.
    ///
    /// The comparison and the write happen as one step, so concurrent
    /// callers can only ever move the hero forward.
    async fn advance_venue_hero(
        &self,
        venue_id: VenueId,
        event_id: EventId,
    ) -> Result<bool, SweepError>;

    /// Inserts the winner notification and increments the recipient's
    /// cover photo counter as one unit.
    ///
    /// Returns the new counter value, or `None` without writing anything
    /// when a notification of the same kind already exists for the event.
    /// A missing profile fails with [`SweepError::ProfileNotFound`] and
    /// leaves no notification behind.
    async fn record_winner_notification(
        &self,
        notification: NewNotification,
    ) -> Result<Option<i64>, SweepError>;

    /// Selected events that have no winner notification yet, ordered by id.
    async fn selected_events_without_notification(
        &self,
        after: Option<EventId>,
        limit: i64,
    ) -> Result<Vec<Event>, SweepError>;

    /// Venues whose hero differs from their latest selected event, as
    /// `(venue, latest event)` pairs ordered by venue id.
    async fn stale_venue_heroes(
        &self,
        after: Option<VenueId>,
        limit: i64,
    ) -> Result<Vec<(VenueId, EventId)>, SweepError>;
}
