//! In-memory implementation of [`SweepStore`].
//!
//! All tables live behind one [`tokio::sync::RwLock`], so every trait
//! method observes and mutates a consistent snapshot. Conditional writes
//! behave exactly like their `... WHERE col IS NULL` SQL counterparts.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::store::{ClosedCursor, SweepStore, WindowCursor};
use crate::domain::{
    Event, EventId, NewNotification, Notification, NotificationKind, PhotoSubmission, Profile,
    SubmissionId, UserId, Venue, VenueId,
};
use crate::error::SweepError;

#[derive(Debug, Default)]
struct Tables {
    venues: HashMap<VenueId, Venue>,
    events: HashMap<EventId, Event>,
    submissions: HashMap<SubmissionId, PhotoSubmission>,
    profiles: HashMap<UserId, Profile>,
    notifications: Vec<Notification>,
}

impl Tables {
    fn latest_selected(&self, venue_id: VenueId) -> Option<EventId> {
        self.events
            .values()
            .filter(|e| e.venue_id == venue_id && e.selected_submission.is_some())
            .max_by_key(|e| (e.event_date, e.id))
            .map(|e| e.id)
    }

    fn has_notification(&self, event_id: EventId, kind: NotificationKind) -> bool {
        self.notifications
            .iter()
            .any(|n| n.event_id == event_id && n.kind == kind)
    }
}

/// Process-local store used for tests and database-less runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a type-erased handle sharing this store.
    #[must_use]
    pub fn handle(self: &Arc<Self>) -> Arc<dyn SweepStore> {
        Arc::<Self>::clone(self)
    }

    /// Inserts or replaces a venue.
    pub async fn insert_venue(&self, venue: Venue) {
        self.tables.write().await.venues.insert(venue.id, venue);
    }

    /// Inserts or replaces an event.
    pub async fn insert_event(&self, event: Event) {
        self.tables.write().await.events.insert(event.id, event);
    }

    /// Inserts or replaces a submission.
    pub async fn insert_submission(&self, submission: PhotoSubmission) {
        self.tables
            .write()
            .await
            .submissions
            .insert(submission.id, submission);
    }

    /// Inserts or replaces a profile.
    pub async fn insert_profile(&self, profile: Profile) {
        self.tables.write().await.profiles.insert(profile.id, profile);
    }

    /// Returns a copy of the venue.
    pub async fn venue(&self, venue_id: VenueId) -> Option<Venue> {
        self.tables.read().await.venues.get(&venue_id).cloned()
    }

    /// Returns a copy of the event.
    pub async fn event(&self, event_id: EventId) -> Option<Event> {
        self.tables.read().await.events.get(&event_id).cloned()
    }

    /// Returns all notifications in insertion order.
    pub async fn notifications(&self) -> Vec<Notification> {
        self.tables.read().await.notifications.clone()
    }

    /// Returns the user's cover photo counter, if the profile exists.
    pub async fn cover_photo_count(&self, user_id: UserId) -> Option<i64> {
        self.tables
            .read()
            .await
            .profiles
            .get(&user_id)
            .map(|p| p.cover_photo_count)
    }
}

fn page_len(limit: i64) -> usize {
    usize::try_from(limit).unwrap_or(0)
}

#[async_trait]
impl SweepStore for MemoryStore {
    async fn events_without_window(
        &self,
        after: Option<WindowCursor>,
        limit: i64,
    ) -> Result<Vec<Event>, SweepError> {
        let tables = self.tables.read().await;
        let mut events: Vec<Event> = tables
            .events
            .values()
            .filter(|e| e.voting_closes_at.is_none())
            .filter(|e| after.is_none_or(|cursor| (e.event_date, e.id) > cursor))
            .cloned()
            .collect();
        events.sort_by_key(|e| (e.event_date, e.id));
        events.truncate(page_len(limit));
        Ok(events)
    }

    async fn assign_voting_close(
        &self,
        event_id: EventId,
        closes_at: DateTime<Utc>,
    ) -> Result<bool, SweepError> {
        let mut tables = self.tables.write().await;
        let event = tables
            .events
            .get_mut(&event_id)
            .ok_or(SweepError::EventNotFound(event_id))?;
        if event.voting_closes_at.is_some() {
            return Ok(false);
        }
        event.voting_closes_at = Some(closes_at);
        Ok(true)
    }

    async fn get_event(&self, event_id: EventId) -> Result<Option<Event>, SweepError> {
        Ok(self.event(event_id).await)
    }

    async fn closed_unselected_events(
        &self,
        now: DateTime<Utc>,
        after: Option<ClosedCursor>,
        limit: i64,
    ) -> Result<Vec<Event>, SweepError> {
        let tables = self.tables.read().await;
        let mut events: Vec<(ClosedCursor, Event)> = tables
            .events
            .values()
            .filter(|e| e.selected_submission.is_none())
            .filter_map(|e| match e.voting_closes_at {
                Some(closes_at) if closes_at < now => Some(((closes_at, e.id), e.clone())),
                _ => None,
            })
            .filter(|(key, _)| after.is_none_or(|cursor| *key > cursor))
            .collect();
        events.sort_by_key(|(key, _)| *key);
        Ok(events
            .into_iter()
            .take(page_len(limit))
            .map(|(_, e)| e)
            .collect())
    }

    async fn eligible_submissions(
        &self,
        event_id: EventId,
    ) -> Result<Vec<PhotoSubmission>, SweepError> {
        let tables = self.tables.read().await;
        Ok(tables
            .submissions
            .values()
            .filter(|s| s.event_id == event_id && s.is_eligible())
            .cloned()
            .collect())
    }

    async fn get_submission(
        &self,
        submission_id: SubmissionId,
    ) -> Result<Option<PhotoSubmission>, SweepError> {
        Ok(self
            .tables
            .read()
            .await
            .submissions
            .get(&submission_id)
            .cloned())
    }

    async fn commit_selection(
        &self,
        event_id: EventId,
        submission_id: SubmissionId,
        photo_url: &str,
    ) -> Result<bool, SweepError> {
        let mut tables = self.tables.write().await;
        let event = tables
            .events
            .get_mut(&event_id)
            .ok_or(SweepError::EventNotFound(event_id))?;
        if event.selected_submission.is_some() {
            return Ok(false);
        }
        event.selected_submission = Some(submission_id);
        event.selected_photo_url = Some(photo_url.to_string());
        Ok(true)
    }

    async fn latest_selected_event(
        &self,
        venue_id: VenueId,
    ) -> Result<Option<EventId>, SweepError> {
        let tables = self.tables.read().await;
        Ok(tables.latest_selected(venue_id))
    }

    async fn advance_venue_hero(
        &self,
        venue_id: VenueId,
        event_id: EventId,
    ) -> Result<bool, SweepError> {
        let mut tables = self.tables.write().await;
        let order_key = |id: EventId| tables.events.get(&id).map(|e| (e.event_date, e.id));
        let candidate = order_key(event_id);
        let Some(current) = tables.venues.get(&venue_id).map(|v| v.hero_event) else {
            return Ok(false);
        };
        let blocked = match (current.and_then(order_key), candidate) {
            (Some(current), Some(candidate)) => current > candidate,
            (Some(_), None) => true,
            (None, _) => false,
        };
        if blocked {
            return Ok(false);
        }

        if let Some(venue) = tables.venues.get_mut(&venue_id) {
            venue.hero_event = Some(event_id);
        }
        Ok(true)
    }

    async fn record_winner_notification(
        &self,
        notification: NewNotification,
    ) -> Result<Option<i64>, SweepError> {
        let mut tables = self.tables.write().await;
        if tables.has_notification(notification.event_id, notification.kind) {
            return Ok(None);
        }
        if !tables.profiles.contains_key(&notification.recipient) {
            return Err(SweepError::ProfileNotFound(notification.recipient));
        }

        let id = i64::try_from(tables.notifications.len())
            .map_err(|e| SweepError::Internal(e.to_string()))?
            + 1;
        tables.notifications.push(Notification {
            id,
            recipient: notification.recipient,
            kind: notification.kind,
            message: notification.message,
            event_id: notification.event_id,
            is_read: false,
            created_at: Utc::now(),
        });

        let profile = tables
            .profiles
            .get_mut(&notification.recipient)
            .ok_or(SweepError::ProfileNotFound(notification.recipient))?;
        profile.cover_photo_count += 1;
        Ok(Some(profile.cover_photo_count))
    }

    async fn selected_events_without_notification(
        &self,
        after: Option<EventId>,
        limit: i64,
    ) -> Result<Vec<Event>, SweepError> {
        let tables = self.tables.read().await;
        let mut events: Vec<Event> = tables
            .events
            .values()
            .filter(|e| e.selected_submission.is_some())
            .filter(|e| after.is_none_or(|cursor| e.id > cursor))
            .filter(|e| !tables.has_notification(e.id, NotificationKind::CoverPhotoSelected))
            .cloned()
            .collect();
        events.sort_by_key(|e| e.id);
        events.truncate(page_len(limit));
        Ok(events)
    }

    async fn stale_venue_heroes(
        &self,
        after: Option<VenueId>,
        limit: i64,
    ) -> Result<Vec<(VenueId, EventId)>, SweepError> {
        let tables = self.tables.read().await;
        let mut stale: Vec<(VenueId, EventId)> = tables
            .venues
            .values()
            .filter(|v| after.is_none_or(|cursor| v.id > cursor))
            .filter_map(|v| {
                let latest = tables.latest_selected(v.id)?;
                (v.hero_event != Some(latest)).then_some((v.id, latest))
            })
            .collect();
        stale.sort_by_key(|(venue, _)| *venue);
        stale.truncate(page_len(limit));
        Ok(stale)
    }
}
