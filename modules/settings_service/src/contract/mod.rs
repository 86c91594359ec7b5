//! Contract layer - public API types for inter-module communication
//!
//! NO serde derives on models - they are pure domain types.

pub mod error;
pub mod model;

pub use error::SettingsError;
pub use model::*;
