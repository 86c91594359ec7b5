//! BrainForge server
//!
//! Builds every module from one layered configuration, connects them
//! through event adapters and serves the combined router.

pub mod app;
pub mod bridge;
pub mod config;
pub mod telemetry;
