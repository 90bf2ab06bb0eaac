//! Venues and user profiles touched by propagation and notification.

use serde::Serialize;

use super::{EventId, UserId, VenueId};

/// A venue and the event currently supplying its hero image.
///
/// `hero_event` is a derived pointer: it should reference the venue's
/// most recent event with a selected photo, and is recomputed on every
/// propagation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Venue {
    /// Venue identifier.
    pub id: VenueId,
    /// Display name.
    pub name: String,
    /// Event supplying the hero image.
    pub hero_event: Option<EventId>,
}

impl Venue {
    /// Creates a venue with no hero.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: VenueId::new(),
            name: name.into(),
            hero_event: None,
        }
    }
}

/// The slice of a user profile the engine writes to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Profile {
    /// User identifier.
    pub id: UserId,
    /// Number of events whose cover photo this user supplied.
    pub cover_photo_count: i64,
}

impl Profile {
    /// Creates a profile with a zero counter.
    #[must_use]
    pub const fn new(id: UserId) -> Self {
        Self {
            id,
            cover_photo_count: 0,
        }
    }
}
