//! Voting-window assignment.

use std::sync::Arc;

use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};

use crate::domain::Event;
use crate::error::SweepError;
use crate::persistence::SweepStore;

/// Computes the voting-close instant for an event date.
///
/// The window runs through the whole of the following calendar day:
/// `date + 1 day` at `23:59:59` UTC. Returns `None` only at the end of
/// the representable calendar.
#[must_use]
pub fn voting_close_for(date: NaiveDate) -> Option<DateTime<Utc>> {
    let next_day = date.checked_add_days(Days::new(1))?;
    let end_of_day = NaiveTime::from_hms_opt(23, 59, 59)?;
    Some(next_day.and_time(end_of_day).and_utc())
}

/// The voting-close timestamp an event ended up with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowAssignment {
    /// Stored voting-close instant.
    pub closes_at: DateTime<Utc>,
    /// Whether this call wrote it.
    pub written: bool,
}

/// Assigns voting-close timestamps to events that do not have one.
#[derive(Debug, Clone)]
pub struct WindowScheduler {
    store: Arc<dyn SweepStore>,
}

impl WindowScheduler {
    /// Creates a scheduler over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn SweepStore>) -> Self {
        Self { store }
    }

    /// Ensures the event has a voting-close timestamp and returns it.
    ///
    /// An existing value is returned untouched. Otherwise the computed
    /// value is written only if the column is still null; when a
    /// concurrent caller won that write, the stored value is re-read and
    /// returned instead. [`WindowAssignment::written`] is `true` only when
    /// this call performed the write.
    ///
    /// # Errors
    ///
    /// Returns a [`SweepError`] on storage failure, or
    /// [`SweepError::EventNotFound`] if the event vanished between the
    /// lost write and the re-read.
    pub async fn assign_window_if_unset(
        &self,
        event: &Event,
    ) -> Result<WindowAssignment, SweepError> {
        if let Some(closes_at) = event.voting_closes_at {
            return Ok(WindowAssignment {
                closes_at,
                written: false,
            });
        }

        let closes_at = voting_close_for(event.event_date).ok_or_else(|| {
            SweepError::Internal(format!("event date {} out of range", event.event_date))
        })?;

        if self.store.assign_voting_close(event.id, closes_at).await? {
            tracing::debug!(event_id = %event.id, %closes_at, "voting window assigned");
            return Ok(WindowAssignment {
                closes_at,
                written: true,
            });
        }

        let closes_at = self
            .store
            .get_event(event.id)
            .await?
            .and_then(|stored| stored.voting_closes_at)
            .ok_or(SweepError::EventNotFound(event.id))?;
        tracing::debug!(event_id = %event.id, %closes_at, "voting window set concurrently");
        Ok(WindowAssignment {
            closes_at,
            written: false,
        })
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::VenueId;
    use crate::persistence::MemoryStore;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        let Some(date) = NaiveDate::from_ymd_opt(y, m, d) else {
            panic!("valid date");
        };
        date
    }

    #[test]
    fn window_closes_end_of_next_day() {
        let Some(expected) = Utc.with_ymd_and_hms(2024, 5, 11, 23, 59, 59).single() else {
            panic!("valid timestamp");
        };
        assert_eq!(voting_close_for(date(2024, 5, 10)), Some(expected));
    }

    #[test]
    fn window_crosses_year_boundary() {
        let Some(expected) = Utc.with_ymd_and_hms(2025, 1, 1, 23, 59, 59).single() else {
            panic!("valid timestamp");
        };
        assert_eq!(voting_close_for(date(2024, 12, 31)), Some(expected));
    }

    #[tokio::test]
    async fn assignment_is_idempotent() {
        let store = Arc::new(MemoryStore::new());
        let event = Event::new(VenueId::new(), date(2024, 5, 10));
        let id = event.id;
        store.insert_event(event.clone()).await;

        let scheduler = WindowScheduler::new(store.handle());
        let Ok(first) = scheduler.assign_window_if_unset(&event).await else {
            panic!("first assignment failed");
        };
        // Stale snapshot: the conditional write loses and the stored value wins.
        let Ok(second) = scheduler.assign_window_if_unset(&event).await else {
            panic!("second assignment failed");
        };
        assert!(first.written);
        assert!(!second.written);
        assert_eq!(first.closes_at, second.closes_at);

        let Some(stored) = store.event(id).await else {
            panic!("event missing");
        };
        assert_eq!(stored.voting_closes_at, Some(first.closes_at));
    }

    #[tokio::test]
    async fn existing_window_is_never_overwritten() {
        let store = Arc::new(MemoryStore::new());
        let Some(preset) = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).single() else {
            panic!("valid timestamp");
        };
        let event = Event::new(VenueId::new(), date(2024, 5, 10)).with_voting_closes_at(preset);
        store.insert_event(event.clone()).await;

        let scheduler = WindowScheduler::new(store.handle());
        let result = scheduler.assign_window_if_unset(&event).await;
        assert!(matches!(
            result,
            Ok(WindowAssignment { closes_at, written: false }) if closes_at == preset
        ));
    }
}
