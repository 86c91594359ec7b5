//! Route registration

use super::handlers;
use crate::domain::Service;
use axum::{
    routing::{get, put},
    Extension, Router,
};
use std::sync::Arc;

pub fn register_routes(router: Router, service: Arc<Service>) -> anyhow::Result<Router> {
    let router = router
        .route("/settings", get(handlers::list_settings))
        .route(
            "/settings/{key}",
            get(handlers::get_setting)
                .put(handlers::upsert_setting)
                .delete(handlers::delete_setting),
        )
        .route("/settings/{key}/lock", put(handlers::lock_setting))
        .layer(Extension(service));

    Ok(router)
}
