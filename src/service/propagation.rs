//! Venue hero propagation.

use std::sync::Arc;

use crate::domain::{EventId, VenueId};
use crate::error::SweepError;
use crate::persistence::SweepStore;

/// Keeps a venue's hero pointer on its most recent selected event.
#[derive(Debug, Clone)]
pub struct PropagationEngine {
    store: Arc<dyn SweepStore>,
}

impl PropagationEngine {
    /// Creates a propagation engine over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn SweepStore>) -> Self {
        Self { store }
    }

    /// Points the venue's hero at `event_id` if, and only if, it is now
    /// the venue's latest-dated event with a selection.
    ///
    /// The latest event is recomputed from storage on every call, so
    /// events committed out of chronological order never let an older
    /// photo replace a newer one. Returns `true` when the pointer was
    /// written, `false` when a newer selection holds it or the venue row
    /// is missing. The storage write itself refuses to move the hero
    /// backwards, so a concurrent caller holding a stale read cannot
    /// regress it.
    ///
    /// # Errors
    ///
    /// Returns a [`SweepError`] on storage failure.
    pub async fn maybe_propagate_hero(
        &self,
        event_id: EventId,
        venue_id: VenueId,
    ) -> Result<bool, SweepError> {
        let latest = self.store.latest_selected_event(venue_id).await?;
        if latest != Some(event_id) {
            tracing::debug!(%event_id, %venue_id, ?latest, "newer selection holds venue hero");
            return Ok(false);
        }

        if !self.store.advance_venue_hero(venue_id, event_id).await? {
            tracing::warn!(%event_id, %venue_id, "venue hero not advanced");
            return Ok(false);
        }
        tracing::info!(%event_id, %venue_id, "venue hero updated");
        Ok(true)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{Event, SubmissionId, Venue};
    use crate::persistence::MemoryStore;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        let Some(date) = NaiveDate::from_ymd_opt(y, m, d) else {
            panic!("valid date");
        };
        date
    }

    async fn select(store: &MemoryStore, event: EventId) {
        let committed = store
            .commit_selection(event, SubmissionId::new(), "https://img/x.jpg")
            .await;
        assert!(matches!(committed, Ok(true)));
    }

    async fn setup() -> (Arc<MemoryStore>, VenueId, EventId, EventId) {
        let store = Arc::new(MemoryStore::new());
        let venue = Venue::new("Riverside Park");
        let venue_id = venue.id;
        store.insert_venue(venue).await;

        let january = Event::new(venue_id, date(2024, 1, 1));
        let february = Event::new(venue_id, date(2024, 2, 1));
        let (e1, e2) = (january.id, february.id);
        store.insert_event(january).await;
        store.insert_event(february).await;
        (store, venue_id, e1, e2)
    }

    #[tokio::test]
    async fn chronological_order_ends_on_newest() {
        let (store, venue_id, e1, e2) = setup().await;
        let engine = PropagationEngine::new(store.handle());

        select(&store, e1).await;
        assert!(matches!(engine.maybe_propagate_hero(e1, venue_id).await, Ok(true)));
        select(&store, e2).await;
        assert!(matches!(engine.maybe_propagate_hero(e2, venue_id).await, Ok(true)));

        let hero = store.venue(venue_id).await.and_then(|v| v.hero_event);
        assert_eq!(hero, Some(e2));
    }

    #[tokio::test]
    async fn reverse_order_never_regresses() {
        let (store, venue_id, e1, e2) = setup().await;
        let engine = PropagationEngine::new(store.handle());

        select(&store, e2).await;
        assert!(matches!(engine.maybe_propagate_hero(e2, venue_id).await, Ok(true)));
        select(&store, e1).await;
        assert!(matches!(engine.maybe_propagate_hero(e1, venue_id).await, Ok(false)));

        let hero = store.venue(venue_id).await.and_then(|v| v.hero_event);
        assert_eq!(hero, Some(e2));
    }

    #[tokio::test]
    async fn rerun_is_idempotent() {
        let (store, venue_id, _, e2) = setup().await;
        let engine = PropagationEngine::new(store.handle());

        select(&store, e2).await;
        for _ in 0..2 {
            assert!(matches!(engine.maybe_propagate_hero(e2, venue_id).await, Ok(true)));
        }
        let hero = store.venue(venue_id).await.and_then(|v| v.hero_event);
        assert_eq!(hero, Some(e2));
    }

    #[tokio::test]
    async fn missing_venue_is_not_reported_as_updated() {
        let store = Arc::new(MemoryStore::new());
        let orphan = Event::new(VenueId::new(), date(2024, 3, 1));
        let (event_id, venue_id) = (orphan.id, orphan.venue_id);
        store.insert_event(orphan).await;
        select(&store, event_id).await;

        let engine = PropagationEngine::new(store.handle());
        assert!(matches!(engine.maybe_propagate_hero(event_id, venue_id).await, Ok(false)));
    }
}
