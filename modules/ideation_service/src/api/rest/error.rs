//! HTTP error mapping to RFC-9457 Problem Details

use crate::contract::IdeationError;
use axum::http::StatusCode;
use brainforge_kit::Problem;

/// Map domain errors to HTTP Problem Details
pub fn map_domain_error(error: IdeationError) -> Problem {
    match error {
        IdeationError::NotFound { resource, id } => Problem::not_found(&resource, id),
        IdeationError::Conflict { reason } => Problem::conflict(reason),
        IdeationError::Validation { message } => Problem::bad_request(message),
        IdeationError::Forbidden { reason } => Problem::forbidden(reason),

        // Gateway failures keep the gateway's own statuses
        IdeationError::Ai(inner) => ai_gateway::api::rest::error::map_domain_error(inner),

        IdeationError::AiResponse { message } => {
            Problem::new(StatusCode::BAD_GATEWAY, "Unusable AI Response").with_detail(message)
        }

        IdeationError::Internal => Problem::internal(),
    }
}
