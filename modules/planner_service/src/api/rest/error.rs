//! HTTP error mapping to RFC-9457 Problem Details

use crate::contract::PlannerError;
use brainforge_kit::Problem;

/// Map domain errors to HTTP Problem Details
pub fn map_domain_error(error: PlannerError) -> Problem {
    match error {
        PlannerError::NotFound { resource, id } => Problem::not_found(&resource, id),
        PlannerError::Conflict { reason } => Problem::conflict(reason),
        PlannerError::Validation { message } => Problem::bad_request(message),
        PlannerError::Forbidden { reason } => Problem::forbidden(reason),
        PlannerError::Internal => Problem::internal(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_error_kind() {
        assert_eq!(map_domain_error(PlannerError::not_found("task", "t1")).status, 404);
        assert_eq!(map_domain_error(PlannerError::conflict("active")).status, 409);
        assert_eq!(map_domain_error(PlannerError::validation("bad")).status, 400);
        assert_eq!(map_domain_error(PlannerError::forbidden("no")).status, 403);
        assert_eq!(map_domain_error(PlannerError::Internal).status, 500);
    }
}
