//! Contract error types for the AI gateway

use super::model::ProviderKind;

/// AI gateway domain errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AiGatewayError {
    #[error("{resource} not found: {id}")]
    NotFound { resource: String, id: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Forbidden: {reason}")]
    Forbidden { reason: String },

    /// Neither the user nor the system has a key for the provider
    #[error("No API key configured for {provider}")]
    NoKeyConfigured { provider: ProviderKind },

    /// The user's key was rejected by the provider or is deactivated
    #[error("API key for {provider} is invalid: {reason}")]
    KeyInvalid { provider: ProviderKind, reason: String },

    #[error("{provider} rate limit reached")]
    RateLimited { provider: ProviderKind },

    #[error("{provider} is unavailable: {message}")]
    ProviderUnavailable { provider: ProviderKind, message: String },

    #[error("Internal error")]
    Internal,
}

impl AiGatewayError {
    pub fn not_found(resource: &str, id: impl std::fmt::Display) -> Self {
        Self::NotFound {
            resource: resource.to_string(),
            id: id.to_string(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation { message: message.into() }
    }

    pub fn forbidden(reason: impl Into<String>) -> Self {
        Self::Forbidden { reason: reason.into() }
    }

    pub fn key_invalid(provider: ProviderKind, reason: impl Into<String>) -> Self {
        Self::KeyInvalid {
            provider,
            reason: reason.into(),
        }
    }
}
