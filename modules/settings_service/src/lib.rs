//! Settings Service Module
//!
//! System-wide settings addressed by dotted keys (`ai.default_provider`,
//! `features.brainstorm.max_ideas`). Values are JSON, optionally checked
//! against a JSON Schema stored with the setting. Only admins write;
//! members read the settings marked public.

// Public exports
pub mod contract;
pub use contract::{error::SettingsError, SettingUpdate, SystemSetting};

pub mod module;
pub use module::SettingsModule;

// Internal modules (hidden from public API)
#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod config;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;
