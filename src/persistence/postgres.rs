//! PostgreSQL implementation of [`SweepStore`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::models::{AttendanceRow, EventRow};
use super::store::{ClosedCursor, SweepStore, WindowCursor};
use crate::domain::{
    Event, EventId, NewNotification, NotificationKind, PhotoSubmission, SubmissionId, VenueId,
    Visibility,
};
use crate::error::SweepError;

const EVENT_COLUMNS: &str = "id, venue_id, event_date, home_team, away_team, tournament_name, \
     voting_closes_at, selected_attendance_id, selected_photo_url";

/// PostgreSQL-backed storage using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Creates a new store over the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Applies the bundled migrations.
    ///
    /// # Errors
    ///
    /// Returns a [`SweepError::Storage`] if a migration fails.
    pub async fn migrate(&self) -> Result<(), SweepError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| SweepError::Storage(e.to_string()))
    }
}

const ATTENDANCE_COLUMNS: &str =
    "id, user_id, event_id, photo_url, capture_verified, like_count, captured_at, visibility";

#[async_trait]
impl SweepStore for PostgresStore {
    async fn events_without_window(
        &self,
        after: Option<WindowCursor>,
        limit: i64,
    ) -> Result<Vec<Event>, SweepError> {
        let rows = sqlx::query_as::<_, EventRow>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events \
             WHERE voting_closes_at IS NULL \
             AND ($1::date IS NULL OR (event_date, id) > ($1, $2::uuid)) \
             ORDER BY event_date ASC, id ASC LIMIT $3"
        ))
        .bind(after.map(|(date, _)| date))
        .bind(after.map(|(_, id)| Uuid::from(id)))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Event::from).collect())
    }

    async fn assign_voting_close(
        &self,
        event_id: EventId,
        closes_at: DateTime<Utc>,
    ) -> Result<bool, SweepError> {
        let result = sqlx::query(
            "UPDATE events SET voting_closes_at = $2 WHERE id = $1 AND voting_closes_at IS NULL",
        )
        .bind(Uuid::from(event_id))
        .bind(closes_at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn get_event(&self, event_id: EventId) -> Result<Option<Event>, SweepError> {
        let row = sqlx::query_as::<_, EventRow>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id = $1"
        ))
        .bind(Uuid::from(event_id))
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Event::from))
    }

    async fn closed_unselected_events(
        &self,
        now: DateTime<Utc>,
        after: Option<ClosedCursor>,
        limit: i64,
    ) -> Result<Vec<Event>, SweepError> {
        let rows = sqlx::query_as::<_, EventRow>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events \
             WHERE voting_closes_at IS NOT NULL AND voting_closes_at < $1 \
             AND selected_attendance_id IS NULL \
             AND ($2::timestamptz IS NULL OR (voting_closes_at, id) > ($2, $3::uuid)) \
             ORDER BY voting_closes_at ASC, id ASC LIMIT $4"
        ))
        .bind(now)
        .bind(after.map(|(closes_at, _)| closes_at))
        .bind(after.map(|(_, id)| Uuid::from(id)))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Event::from).collect())
    }

    async fn eligible_submissions(
        &self,
        event_id: EventId,
    ) -> Result<Vec<PhotoSubmission>, SweepError> {
        let rows = sqlx::query_as::<_, AttendanceRow>(&format!(
            "SELECT {ATTENDANCE_COLUMNS} FROM attendances \
             WHERE event_id = $1 AND photo_url IS NOT NULL AND visibility <> $2"
        ))
        .bind(Uuid::from(event_id))
        .bind(Visibility::Hidden.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(PhotoSubmission::try_from).collect()
    }

    async fn get_submission(
        &self,
        submission_id: SubmissionId,
    ) -> Result<Option<PhotoSubmission>, SweepError> {
        let row = sqlx::query_as::<_, AttendanceRow>(&format!(
            "SELECT {ATTENDANCE_COLUMNS} FROM attendances WHERE id = $1"
        ))
        .bind(Uuid::from(submission_id))
        .fetch_optional(&self.pool)
        .await?;

        row.map(PhotoSubmission::try_from).transpose()
    }

    async fn commit_selection(
        &self,
        event_id: EventId,
        submission_id: SubmissionId,
        photo_url: &str,
    ) -> Result<bool, SweepError> {
        let result = sqlx::query(
            "UPDATE events SET selected_attendance_id = $2, selected_photo_url = $3 \
             WHERE id = $1 AND selected_attendance_id IS NULL",
        )
        .bind(Uuid::from(event_id))
        .bind(Uuid::from(submission_id))
        .bind(photo_url)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn latest_selected_event(
        &self,
        venue_id: VenueId,
    ) -> Result<Option<EventId>, SweepError> {
        let id = sqlx::query_scalar::<_, Uuid>(
            "SELECT id FROM events \
             WHERE venue_id = $1 AND selected_attendance_id IS NOT NULL \
             ORDER BY event_date DESC, id DESC LIMIT 1",
        )
        .bind(Uuid::from(venue_id))
        .fetch_optional(&self.pool)
        .await?;

        Ok(id.map(EventId::from_uuid))
    }

    async fn advance_venue_hero(
        &self,
        venue_id: VenueId,
        event_id: EventId,
    ) -> Result<bool, SweepError> {
        let result = sqlx::query(
            "UPDATE venues v SET hero_event_id = $2 \
             WHERE v.id = $1 AND ( \
                 NOT EXISTS (SELECT 1 FROM events h WHERE h.id = v.hero_event_id) \
                 OR EXISTS (SELECT 1 FROM events h, events e \
                     WHERE h.id = v.hero_event_id AND e.id = $2 \
                     AND (h.event_date, h.id) <= (e.event_date, e.id)))",
        )
        .bind(Uuid::from(venue_id))
        .bind(Uuid::from(event_id))
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn record_winner_notification(
        &self,
        notification: NewNotification,
    ) -> Result<Option<i64>, SweepError> {
        let recipient = notification.recipient;
        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query(
            "INSERT INTO notifications (recipient_id, kind, message, event_id) \
             VALUES ($1, $2, $3, $4) ON CONFLICT (event_id, kind) DO NOTHING",
        )
        .bind(Uuid::from(recipient))
        .bind(notification.kind.as_str())
        .bind(notification.message)
        .bind(Uuid::from(notification.event_id))
        .execute(&mut *tx)
        .await?;
        if inserted.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        let count = sqlx::query_scalar::<_, i64>(
            "UPDATE profiles SET cover_photo_count = cover_photo_count + 1 \
             WHERE id = $1 RETURNING cover_photo_count",
        )
        .bind(Uuid::from(recipient))
        .fetch_optional(&mut *tx)
        .await?;
        let Some(count) = count else {
            tx.rollback().await?;
            return Err(SweepError::ProfileNotFound(recipient));
        };

        tx.commit().await?;
        Ok(Some(count))
    }

    async fn selected_events_without_notification(
        &self,
        after: Option<EventId>,
        limit: i64,
    ) -> Result<Vec<Event>, SweepError> {
        let rows = sqlx::query_as::<_, EventRow>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events \
             WHERE selected_attendance_id IS NOT NULL \
             AND ($1::uuid IS NULL OR id > $1) \
             AND NOT EXISTS (SELECT 1 FROM notifications n \
                 WHERE n.event_id = events.id AND n.kind = $2) \
             ORDER BY id ASC LIMIT $3"
        ))
        .bind(after.map(Uuid::from))
        .bind(NotificationKind::CoverPhotoSelected.as_str())
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Event::from).collect())
    }

    async fn stale_venue_heroes(
        &self,
        after: Option<VenueId>,
        limit: i64,
    ) -> Result<Vec<(VenueId, EventId)>, SweepError> {
        let rows = sqlx::query_as::<_, (Uuid, Uuid)>(
            "SELECT v.id, latest.id FROM venues v \
             CROSS JOIN LATERAL (SELECT e.id FROM events e \
                 WHERE e.venue_id = v.id AND e.selected_attendance_id IS NOT NULL \
                 ORDER BY e.event_date DESC, e.id DESC LIMIT 1) latest \
             WHERE v.hero_event_id IS DISTINCT FROM latest.id \
             AND ($1::uuid IS NULL OR v.id > $1) \
             ORDER BY v.id ASC LIMIT $2",
        )
        .bind(after.map(Uuid::from))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(venue, event)| (VenueId::from_uuid(venue), EventId::from_uuid(event)))
            .collect())
    }
}
