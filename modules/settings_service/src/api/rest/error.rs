//! HTTP error mapping to RFC-9457 Problem Details

use crate::contract::SettingsError;
use axum::http::StatusCode;
use brainforge_kit::Problem;

/// Map domain errors to HTTP Problem Details
pub fn map_domain_error(error: SettingsError) -> Problem {
    match error {
        SettingsError::NotFound { resource, id } => Problem::not_found(&resource, id),

        SettingsError::Validation { message } => Problem::bad_request(message),

        SettingsError::SchemaValidation { errors } => {
            Problem::new(StatusCode::UNPROCESSABLE_ENTITY, "Schema Validation Failed")
                .with_detail(format!("Validation errors: {}", errors.join(", ")))
        }

        SettingsError::Forbidden { reason } => Problem::forbidden(reason),

        SettingsError::Locked { key } => Problem::new(StatusCode::LOCKED, "Setting Locked")
            .with_detail(format!("Setting '{}' is locked and cannot be modified", key)),

        SettingsError::Internal => Problem::internal(),
    }
}
