//! REST endpoint handlers.

pub mod sweep;
pub mod system;
