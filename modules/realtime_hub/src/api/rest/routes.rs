//! Route registration

use super::handlers;
use crate::domain::Service;
use axum::{
    routing::{get, post},
    Extension, Router,
};
use std::sync::Arc;

pub fn register_routes(router: Router, service: Arc<Service>) -> anyhow::Result<Router> {
    let router = router
        .route("/realtime/rooms/{room}/events", get(handlers::room_events))
        .route("/realtime/rooms/{room}/join", post(handlers::join_room))
        .route("/realtime/rooms/{room}/heartbeat", post(handlers::heartbeat))
        .route("/realtime/rooms/{room}/leave", post(handlers::leave_room))
        .route("/realtime/rooms/{room}/presence", get(handlers::room_presence))
        .layer(Extension(service));

    Ok(router)
}
