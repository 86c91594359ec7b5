//! HTTP error mapping to RFC-9457 Problem Details

use crate::contract::RealtimeError;
use brainforge_kit::Problem;

pub fn map_domain_error(error: RealtimeError) -> Problem {
    match error {
        RealtimeError::InvalidRoom { room } => Problem::bad_request(format!(
            "Invalid room '{}'; expected team:<id>, board:<id>, session:<id> or user:<id>",
            room
        )),
        RealtimeError::Forbidden { reason } => Problem::forbidden(reason),
        RealtimeError::NotFound { resource, id } => Problem::not_found(&resource, id),
        RealtimeError::Internal => Problem::internal(),
    }
}
