//! Service layer: the deferred selection engine.
//!
//! [`SweepRunner`] drives the other components for every event whose
//! voting window has closed. Each component receives the storage handle
//! explicitly at construction.

pub mod candidate_selector;
pub mod propagation;
pub mod sweep_runner;
pub mod window_scheduler;
pub mod winner_notifier;

pub use candidate_selector::CandidateSelector;
pub use propagation::PropagationEngine;
pub use sweep_runner::{SweepOptions, SweepRunner};
pub use window_scheduler::{WindowAssignment, WindowScheduler};
pub use winner_notifier::WinnerNotifier;
