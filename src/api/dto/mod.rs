//! Data Transfer Objects for REST response serialization.

pub mod sweep_dto;

pub use sweep_dto::*;
