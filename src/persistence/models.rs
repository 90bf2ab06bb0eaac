//! Database row models and their conversion into domain records.
//!
//! Rows are decoded once here; the rest of the crate only sees the
//! typed records from [`crate::domain`].

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::domain::{Event, EventId, PhotoSubmission, SubmissionId, UserId, VenueId, Visibility};
use crate::error::SweepError;

/// A row from the `events` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EventRow {
    /// Event id.
    pub id: Uuid,
    /// Owning venue.
    pub venue_id: Uuid,
    /// Calendar date.
    pub event_date: NaiveDate,
    /// Home team display name.
    pub home_team: Option<String>,
    /// Away team display name.
    pub away_team: Option<String>,
    /// Tournament name.
    pub tournament_name: Option<String>,
    /// Voting-close timestamp.
    pub voting_closes_at: Option<DateTime<Utc>>,
    /// Winning attendance id.
    pub selected_attendance_id: Option<Uuid>,
    /// Cached winning photo URL.
    pub selected_photo_url: Option<String>,
}

impl From<EventRow> for Event {
    fn from(row: EventRow) -> Self {
        Self {
            id: EventId::from_uuid(row.id),
            venue_id: VenueId::from_uuid(row.venue_id),
            event_date: row.event_date,
            home_team: row.home_team,
            away_team: row.away_team,
            tournament_name: row.tournament_name,
            voting_closes_at: row.voting_closes_at,
            selected_submission: row.selected_attendance_id.map(SubmissionId::from_uuid),
            selected_photo_url: row.selected_photo_url,
        }
    }
}

/// A row from the `attendances` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AttendanceRow {
    /// Attendance id.
    pub id: Uuid,
    /// Owner.
    pub user_id: Uuid,
    /// Event attended.
    pub event_id: Uuid,
    /// Photo URL.
    pub photo_url: Option<String>,
    /// In-app capture flag.
    pub capture_verified: bool,
    /// Like count.
    pub like_count: i32,
    /// Capture timestamp.
    pub captured_at: Option<DateTime<Utc>>,
    /// Visibility string.
    pub visibility: String,
}

impl TryFrom<AttendanceRow> for PhotoSubmission {
    type Error = SweepError;

    fn try_from(row: AttendanceRow) -> Result<Self, Self::Error> {
        let like_count = u32::try_from(row.like_count).map_err(|_| {
            SweepError::InvalidRecord(format!(
                "attendance {} has negative like count {}",
                row.id, row.like_count
            ))
        })?;
        let visibility = row
            .visibility
            .parse::<Visibility>()
            .map_err(|e| SweepError::InvalidRecord(format!("attendance {}: {e}", row.id)))?;

        Ok(Self {
            id: SubmissionId::from_uuid(row.id),
            user_id: UserId::from_uuid(row.user_id),
            event_id: EventId::from_uuid(row.event_id),
            photo_url: row.photo_url,
            capture_verified: row.capture_verified,
            like_count,
            captured_at: row.captured_at,
            visibility,
        })
    }
}
