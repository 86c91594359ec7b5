//! Contract error types for settings service
//!
//! These errors are transport-agnostic and used for inter-module communication.

/// Settings service domain errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("{resource} not found: {id}")]
    NotFound { resource: String, id: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    /// The value does not satisfy the setting's JSON Schema
    #[error("Schema validation failed: {}", errors.join(", "))]
    SchemaValidation { errors: Vec<String> },

    #[error("Forbidden: {reason}")]
    Forbidden { reason: String },

    /// Setting is locked against changes
    #[error("Setting is locked: {key}")]
    Locked { key: String },

    #[error("Internal error")]
    Internal,
}

impl SettingsError {
    pub fn not_found(key: &str) -> Self {
        Self::NotFound {
            resource: "setting".to_string(),
            id: key.to_string(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation { message: message.into() }
    }

    pub fn forbidden(reason: impl Into<String>) -> Self {
        Self::Forbidden { reason: reason.into() }
    }

    pub fn locked(key: &str) -> Self {
        Self::Locked { key: key.to_string() }
    }
}
