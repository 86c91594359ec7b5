//! Route registration

use super::handlers;
use crate::domain::Service;
use axum::{
    routing::{get, post, put},
    Extension, Router,
};
use std::sync::Arc;

/// Authenticated AI gateway routes
pub fn register_routes(router: Router, service: Arc<Service>) -> anyhow::Result<Router> {
    let router = router
        .route("/ai/providers", get(handlers::list_providers))
        .route("/ai/chat", post(handlers::chat))
        // Keys
        .route("/ai/keys", get(handlers::list_keys))
        .route(
            "/ai/keys/{provider}",
            put(handlers::save_key).delete(handlers::delete_key),
        )
        .route("/ai/keys/{provider}/validate", post(handlers::validate_key))
        .route("/ai/keys/{provider}/default", post(handlers::set_default_provider))
        // Usage
        .route("/ai/usage", get(handlers::list_usage))
        .route("/ai/usage/summary", get(handlers::usage_summary))
        .route("/ai/usage/global", get(handlers::global_usage_summary))
        .layer(Extension(service));

    Ok(router)
}
