//! Contract layer - public API for inter-module communication
//!
//! Transport-agnostic models and the native client traits.

pub mod client;
pub mod error;
pub mod model;

pub use client::{NotificationApi, PlannerApi};
pub use error::PlannerError;
pub use model::*;
