//! Event occurrences and their selection lifecycle.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use super::{EventId, SubmissionId, VenueId};

/// Where an event sits in the open → closed → selected lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionState {
    /// No voting-close timestamp has been assigned yet.
    Unscheduled,
    /// Voting is still open at the observed instant.
    Open,
    /// Voting has closed but no photo has been selected.
    ClosedUnselected,
    /// A winning photo has been committed. Terminal.
    Selected,
}

/// One occurrence at a venue on a calendar date.
///
/// `voting_closes_at` and `selected_submission` are write-once: storage
/// only ever sets them with a conditional "if still null" write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    /// Event identifier.
    pub id: EventId,
    /// Venue hosting the event.
    pub venue_id: VenueId,
    /// Calendar date of the event.
    pub event_date: NaiveDate,
    /// Home team display name.
    pub home_team: Option<String>,
    /// Away team display name.
    pub away_team: Option<String>,
    /// Tournament or event name, used when teams are unknown.
    pub tournament_name: Option<String>,
    /// End of the voting window.
    pub voting_closes_at: Option<DateTime<Utc>>,
    /// Winning submission, once selected.
    pub selected_submission: Option<SubmissionId>,
    /// Cached photo URL of the winning submission.
    pub selected_photo_url: Option<String>,
}

impl Event {
    /// Creates an event with no window and no selection.
    #[must_use]
    pub fn new(venue_id: VenueId, event_date: NaiveDate) -> Self {
        Self {
            id: EventId::new(),
            venue_id,
            event_date,
            home_team: None,
            away_team: None,
            tournament_name: None,
            voting_closes_at: None,
            selected_submission: None,
            selected_photo_url: None,
        }
    }

    /// Sets the home and away team names.
    #[must_use]
    pub fn with_teams(mut self, away: impl Into<String>, home: impl Into<String>) -> Self {
        self.away_team = Some(away.into());
        self.home_team = Some(home.into());
        self
    }

    /// Sets the tournament name.
    #[must_use]
    pub fn with_tournament(mut self, name: impl Into<String>) -> Self {
        self.tournament_name = Some(name.into());
        self
    }

    /// Sets the voting-close timestamp.
    #[must_use]
    pub fn with_voting_closes_at(mut self, closes_at: DateTime<Utc>) -> Self {
        self.voting_closes_at = Some(closes_at);
        self
    }

    /// Returns the lifecycle state as observed at `now`.
    #[must_use]
    pub fn state_at(&self, now: DateTime<Utc>) -> SelectionState {
        if self.selected_submission.is_some() {
            return SelectionState::Selected;
        }
        match self.voting_closes_at {
            None => SelectionState::Unscheduled,
            Some(closes_at) if closes_at < now => SelectionState::ClosedUnselected,
            Some(_) => SelectionState::Open,
        }
    }
}
