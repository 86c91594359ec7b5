//! Route registration

use super::handlers;
use crate::domain::Service;
use axum::{
    routing::{delete, get, patch, post, put},
    Extension, Router,
};
use std::sync::Arc;

/// Routes reachable without a bearer token
pub fn register_public_routes(router: Router, service: Arc<Service>) -> anyhow::Result<Router> {
    let router = router
        .route("/auth/register", post(handlers::register))
        .route("/auth/login", post(handlers::login))
        .layer(Extension(service));

    Ok(router)
}

/// Authenticated identity routes
pub fn register_routes(router: Router, service: Arc<Service>) -> anyhow::Result<Router> {
    let router = router
        .route("/auth/me", get(handlers::me))
        // Users
        .route("/users", get(handlers::list_users))
        .route("/users/me", patch(handlers::update_profile))
        .route("/users/me/password", post(handlers::change_password))
        .route("/users/{user_id}/role", put(handlers::set_user_role))
        // Teams
        .route(
            "/teams",
            post(handlers::create_team).get(handlers::list_teams),
        )
        .route(
            "/teams/{team_id}",
            get(handlers::get_team)
                .patch(handlers::update_team)
                .delete(handlers::delete_team),
        )
        .route("/teams/{team_id}/members", get(handlers::list_members))
        .route(
            "/teams/{team_id}/members/{user_id}",
            put(handlers::change_member_role).delete(handlers::remove_member),
        )
        // Invitations
        .route(
            "/teams/{team_id}/invitations",
            post(handlers::invite).get(handlers::list_team_invitations),
        )
        .route(
            "/teams/{team_id}/invitations/{invitation_id}",
            delete(handlers::revoke_invitation),
        )
        .route("/invitations", get(handlers::list_my_invitations))
        .route("/invitations/{token}/accept", post(handlers::accept_invitation))
        .route("/invitations/{token}/decline", post(handlers::decline_invitation))
        .layer(Extension(service));

    Ok(router)
}
