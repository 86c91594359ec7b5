//! Contract error types for the realtime hub

/// Realtime hub errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RealtimeError {
    #[error("Invalid room '{room}'")]
    InvalidRoom { room: String },

    #[error("Forbidden: {reason}")]
    Forbidden { reason: String },

    #[error("{resource} not found: {id}")]
    NotFound { resource: String, id: String },

    #[error("Internal error")]
    Internal,
}

impl RealtimeError {
    pub fn invalid_room(room: impl Into<String>) -> Self {
        Self::InvalidRoom { room: room.into() }
    }

    pub fn forbidden(reason: impl Into<String>) -> Self {
        Self::Forbidden { reason: reason.into() }
    }

    pub fn not_found(resource: &str, id: impl std::fmt::Display) -> Self {
        Self::NotFound {
            resource: resource.to_string(),
            id: id.to_string(),
        }
    }
}
