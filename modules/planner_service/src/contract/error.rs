//! Contract error types for the planner service

use identity_service::IdentityError;

/// Planner service domain errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlannerError {
    #[error("{resource} not found: {id}")]
    NotFound { resource: String, id: String },

    #[error("Conflict: {reason}")]
    Conflict { reason: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Forbidden: {reason}")]
    Forbidden { reason: String },

    #[error("Internal error")]
    Internal,
}

impl PlannerError {
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
}

/// Membership checks surface as planner errors
impl From<IdentityError> for PlannerError {
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
