//! One-time side effects for a committed selection.

use std::sync::Arc;

use crate::domain::{Event, NewNotification, NotificationKind, PhotoSubmission};
use crate::error::SweepError;
use crate::persistence::SweepStore;

/// Human-readable label for an event.
///
/// Prefers `"Away @ Home"`, then the tournament name, then a generic
/// fallback.
#[must_use]
pub fn event_label(event: &Event) -> String {
    let non_blank = |s: &Option<String>| {
        s.as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    match (non_blank(&event.away_team), non_blank(&event.home_team)) {
        (Some(away), Some(home)) => format!("{away} @ {home}"),
        _ => non_blank(&event.tournament_name).unwrap_or_else(|| "your event".to_string()),
    }
}

/// Notifies the winner and bumps their cover photo counter.
#[derive(Debug, Clone)]
pub struct WinnerNotifier {
    store: Arc<dyn SweepStore>,
}

impl WinnerNotifier {
    /// Creates a notifier over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn SweepStore>) -> Self {
        Self { store }
    }

    /// Enqueues the winner notification and increments the winner's
    /// counter in one storage write.
    ///
    /// The write is keyed on `(event, kind)`, so re-running this for the
    /// same event is a no-op. Returns `true` when effects were applied.
    ///
    /// # Errors
    ///
    /// Returns a [`SweepError`] on storage failure or when the winner's
    /// profile does not exist.
    pub async fn apply_winner_effects(
        &self,
        event: &Event,
        winner: &PhotoSubmission,
    ) -> Result<bool, SweepError> {
        let recipient = winner.user_id;
        let message = format!(
            "Your photo from {} was picked as the event cover!",
            event_label(event)
        );

        let recorded = self
            .store
            .record_winner_notification(NewNotification {
                recipient,
                kind: NotificationKind::CoverPhotoSelected,
                message: Some(message),
                event_id: event.id,
            })
            .await?;
        let Some(count) = recorded else {
            tracing::warn!(event_id = %event.id, %recipient, "winner already notified");
            return Ok(false);
        };

        tracing::info!(
            event_id = %event.id,
            submission_id = %winner.id,
            %recipient,
            cover_photo_count = count,
            "winner notified"
        );
        Ok(true)
    }
}
