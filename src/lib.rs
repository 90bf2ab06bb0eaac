//! # cover-sweep
//!
//! Deferred cover-photo selection for event attendance.
//!
//! Attendees submit photos for an event while its voting window is open.
//! Once the window closes, a sweep picks one winning photo per event,
//! points the venue's hero image at its most recent selected event, and
//! notifies the winner. Every step is safe to re-run: the conditional
//! write of the event's selection is the single commit point that gates
//! all side effects, and later sweeps finish any effect that failed after
//! that point.
//!
//! ## Architecture
//!
//! ```text
//! Scheduler / cron (HTTP, bearer secret)
//!     │
//!     ├── Admin Handler (api/)
//!     │
//!     ├── SweepRunner (service/)
//!     │     ├── WindowScheduler
//!     │     ├── CandidateSelector
//!     │     ├── PropagationEngine
//!     │     └── WinnerNotifier
//!     │
//!     └── SweepStore (persistence/)
//!           ├── PostgreSQL
//!           └── In-memory
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
