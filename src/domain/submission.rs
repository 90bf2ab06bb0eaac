//! Photo submissions competing for an event's cover.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{EventId, SubmissionId, UserId};

/// Who can see an attendance record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    /// Visible to everyone.
    Public,
    /// Visible to followers.
    Followers,
    /// Visible to the owner only.
    Private,
    /// Hidden from everyone. Never eligible for selection.
    Hidden,
}

impl Visibility {
    /// Storage representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Followers => "followers",
            Self::Private => "private",
            Self::Hidden => "hidden",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Visibility {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "public" => Ok(Self::Public),
            "followers" => Ok(Self::Followers),
            "private" => Ok(Self::Private),
            "hidden" => Ok(Self::Hidden),
            other => Err(format!("unknown visibility: {other}")),
        }
    }
}

/// An attendance record with an attached photo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhotoSubmission {
    /// Submission identifier.
    pub id: SubmissionId,
    /// Uploader.
    pub user_id: UserId,
    /// Event the photo was taken at.
    pub event_id: EventId,
    /// Photo URL, absent until upload completes.
    pub photo_url: Option<String>,
    /// True when captured in-app inside the event's trust window.
    pub capture_verified: bool,
    /// Number of likes.
    pub like_count: u32,
    /// Capture timestamp, when known.
    pub captured_at: Option<DateTime<Utc>>,
    /// Visibility of the attendance record.
    pub visibility: Visibility,
}

impl PhotoSubmission {
    /// Creates a public, unverified submission with no likes.
    #[must_use]
    pub fn new(user_id: UserId, event_id: EventId, photo_url: impl Into<String>) -> Self {
        Self {
            id: SubmissionId::new(),
            user_id,
            event_id,
            photo_url: Some(photo_url.into()),
            capture_verified: false,
            like_count: 0,
            captured_at: None,
            visibility: Visibility::Public,
        }
    }

    /// Returns `true` if the submission may compete for selection.
    #[must_use]
    pub fn is_eligible(&self) -> bool {
        self.photo_url.is_some() && self.visibility != Visibility::Hidden
    }
}
