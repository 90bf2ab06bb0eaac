//! Notification records enqueued for out-of-band delivery.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{EventId, UserId};

/// Notification type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// The recipient's photo was selected as an event's cover.
    CoverPhotoSelected,
}

impl NotificationKind {
    /// Storage representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CoverPhotoSelected => "cover_photo_selected",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cover_photo_selected" => Ok(Self::CoverPhotoSelected),
            other => Err(format!("unknown notification kind: {other}")),
        }
    }
}

/// A notification to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNotification {
    /// Recipient.
    pub recipient: UserId,
    /// Type tag.
    pub kind: NotificationKind,
    /// Optional human-readable message.
    pub message: Option<String>,
    /// Event the notification refers to.
    pub event_id: EventId,
}

/// A stored notification row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    /// Row id.
    pub id: i64,
    /// Recipient.
    pub recipient: UserId,
    /// Type tag.
    pub kind: NotificationKind,
    /// Optional human-readable message.
    pub message: Option<String>,
    /// Event the notification refers to.
    pub event_id: EventId,
    /// Read flag.
    pub is_read: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}
