//! HTTP error mapping to RFC-9457 Problem Details

use crate::contract::IdentityError;
use axum::http::StatusCode;
use brainforge_kit::Problem;

/// Map domain errors to HTTP Problem Details
pub fn map_domain_error(error: IdentityError) -> Problem {
    match error {
        IdentityError::NotFound { resource, id } => Problem::not_found(&resource, id),

        IdentityError::Conflict { reason } => Problem::conflict(reason),

        IdentityError::Validation { message } => Problem::bad_request(message),

        IdentityError::Unauthorized { reason } => Problem::unauthorized(reason),

        IdentityError::Forbidden { reason } => Problem::forbidden(reason),

        IdentityError::InvitationExpired => Problem::new(StatusCode::GONE, "Invitation Expired")
            .with_detail("This invitation has expired; ask for a new one"),

        IdentityError::Internal => Problem::internal(),
    }
}
