//! HTTP error mapping to RFC-9457 Problem Details

use crate::contract::AiGatewayError;
use axum::http::StatusCode;
use brainforge_kit::Problem;

/// Map domain errors to HTTP Problem Details
pub fn map_domain_error(error: AiGatewayError) -> Problem {
    match error {
        AiGatewayError::NotFound { resource, id } => Problem::not_found(&resource, id),

        AiGatewayError::Validation { message } => Problem::bad_request(message),

        AiGatewayError::Forbidden { reason } => Problem::forbidden(reason),

        AiGatewayError::NoKeyConfigured { provider } => {
            Problem::new(StatusCode::BAD_REQUEST, "No AI Key Configured").with_detail(format!(
                "add a {} API key in your settings or choose another provider",
                provider
            ))
        }

        AiGatewayError::KeyInvalid { provider, reason } => {
            Problem::new(StatusCode::UNPROCESSABLE_ENTITY, "AI Key Invalid")
                .with_detail(format!("the {} key was rejected: {}", provider, reason))
        }

        AiGatewayError::RateLimited { provider } => {
            Problem::new(StatusCode::TOO_MANY_REQUESTS, "AI Provider Rate Limited")
                .with_detail(format!("{} is rate limiting requests; try again later", provider))
        }

        AiGatewayError::ProviderUnavailable { provider, message } => {
            Problem::new(StatusCode::BAD_GATEWAY, "AI Provider Error")
                .with_detail(format!("{}: {}", provider, message))
        }

        AiGatewayError::Internal => Problem::internal(),
    }
}
