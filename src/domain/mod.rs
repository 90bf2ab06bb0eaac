//! Domain layer: typed entities, identifiers, and sweep outcomes.
//!
//! These are the records decoded once at the storage boundary and passed
//! between the engine components. Nothing here performs I/O.

pub mod event;
pub mod ids;
pub mod notification;
pub mod outcome;
pub mod submission;
pub mod venue;

pub use event::{Event, SelectionState};
pub use ids::{EventId, SubmissionId, UserId, VenueId};
pub use notification::{NewNotification, Notification, NotificationKind};
pub use outcome::{EventFailure, EventOutcome, SweepReport};
pub use submission::{PhotoSubmission, Visibility};
pub use venue::{Profile, Venue};
