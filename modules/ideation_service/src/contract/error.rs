//! Contract error types for the ideation service

use ai_gateway::AiGatewayError;
use identity_service::IdentityError;
use planner_service::PlannerError;

/// Ideation service domain errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdeationError {
    #[error("{resource} not found: {id}")]
    NotFound { resource: String, id: String },

    #[error("Conflict: {reason}")]
    Conflict { reason: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Forbidden: {reason}")]
    Forbidden { reason: String },

    /// The gateway refused or failed the completion
    #[error("AI request failed: {0}")]
    Ai(#[from] AiGatewayError),

    /// The model answered with something unusable
    #[error("Unusable AI response: {message}")]
    AiResponse { message: String },

    #[error("Internal error")]
    Internal,
}

impl IdeationError {
    pub fn not_found(resource: &str, id: impl std::fmt::Display) -> Self {
        Self::NotFound {
            resource: resource.to_string(),
            id: id.to_string(),
        }
    }

    pub fn conflict(reason: impl Into<String>) -> Self {
        Self::Conflict { reason: reason.into() }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation { message: message.into() }
    }

    pub fn forbidden(reason: impl Into<String>) -> Self {
        Self::Forbidden { reason: reason.into() }
    }

    pub fn ai_response(message: impl Into<String>) -> Self {
        Self::AiResponse { message: message.into() }
    }
}

impl From<IdentityError> for IdeationError {
    fn from(error: IdentityError) -> Self {
        match error {
            IdentityError::NotFound { resource, id } => Self::NotFound { resource, id },
            IdentityError::Forbidden { reason } => Self::Forbidden { reason },
            IdentityError::Validation { message } => Self::Validation { message },
            IdentityError::Conflict { reason } => Self::Conflict { reason },
            IdentityError::Unauthorized { reason } => Self::Forbidden { reason },
            IdentityError::InvitationExpired | IdentityError::Internal => Self::Internal,
        }
    }
}

/// Task creation and backlog reads go through the planner
impl From<PlannerError> for IdeationError {
    fn from(error: PlannerError) -> Self {
        match error {
            PlannerError::NotFound { resource, id } => Self::NotFound { resource, id },
            PlannerError::Conflict { reason } => Self::Conflict { reason },
            PlannerError::Validation { message } => Self::Validation { message },
            PlannerError::Forbidden { reason } => Self::Forbidden { reason },
            PlannerError::Internal => Self::Internal,
        }
    }
}
