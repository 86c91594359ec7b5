//! Route registration

use super::handlers;
use crate::domain::Service;
use axum::{
    routing::{delete, get, post},
    Extension, Router,
};
use std::sync::Arc;

pub fn register_routes(router: Router, service: Arc<Service>) -> anyhow::Result<Router> {
    let router = router
        // Brainstorms
        .route(
            "/teams/{team_id}/brainstorms",
            get(handlers::list_sessions).post(handlers::create_session),
        )
        .route(
            "/brainstorms/{session_id}",
            get(handlers::get_session).delete(handlers::delete_session),
        )
        .route("/brainstorms/{session_id}/ideas", post(handlers::add_idea))
        .route(
            "/brainstorms/{session_id}/ideas/{idea_id}",
            delete(handlers::remove_idea),
        )
        .route("/brainstorms/{session_id}/ideas/{idea_id}/vote", post(handlers::vote_idea))
        .route("/brainstorms/{session_id}/generate", post(handlers::generate_ideas))
        .route("/brainstorms/{session_id}/summarize", post(handlers::summarize))
        .route("/brainstorms/{session_id}/close", post(handlers::close_session))
        .route("/brainstorms/{session_id}/convert", post(handlers::convert_ideas))
        // Diagrams
        .route(
            "/teams/{team_id}/diagrams",
            get(handlers::list_diagrams).post(handlers::create_diagram),
        )
        .route("/teams/{team_id}/diagrams/generate", post(handlers::generate_diagram))
        .route(
            "/diagrams/{diagram_id}",
            get(handlers::get_diagram)
                .patch(handlers::update_diagram)
                .delete(handlers::delete_diagram),
        )
        // Sprint planning
        .route("/teams/{team_id}/sprint-suggestions", post(handlers::suggest_sprint))
        .layer(Extension(service));

    Ok(router)
}
