//! Contract layer - public API types for inter-module communication
//!
//! NO serde derives on models - they are pure domain types.

pub mod client;
pub mod error;
pub mod model;

pub use client::IdeationApi;
pub use error::IdeationError;
pub use model::*;
