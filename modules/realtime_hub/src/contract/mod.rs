//! Contract layer - public API types for inter-module communication
//!
//! NO serde derives on models - they are pure domain types. Event
//! payloads are already JSON.

pub mod client;
pub mod error;
pub mod model;

pub use client::RealtimeApi;
pub use error::RealtimeError;
pub use model::*;
