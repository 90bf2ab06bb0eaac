//! Persistence layer: the storage boundary consumed by the sweep.
//!
//! [`SweepStore`] is the explicit storage handle every engine component
//! receives. [`PostgresStore`] talks to the relational tables owned by
//! the surrounding application; [`MemoryStore`] mirrors its semantics
//! in-process.

pub mod memory;
pub mod models;
pub mod postgres;
pub mod store;

pub use memory::MemoryStore;
pub use postgres::PostgresStore;
pub use store::{ClosedCursor, SweepStore, WindowCursor};
