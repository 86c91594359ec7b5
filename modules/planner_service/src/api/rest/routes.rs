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
        // Tasks
        .route(
            "/teams/{team_id}/tasks",
            get(handlers::list_tasks).post(handlers::create_task),
        )
        .route("/teams/{team_id}/board", get(handlers::board))
        .route("/teams/{team_id}/backlog", get(handlers::backlog))
        .route(
            "/tasks/{task_id}",
            get(handlers::get_task)
                .patch(handlers::update_task)
                .delete(handlers::delete_task),
        )
        .route("/tasks/{task_id}/move", post(handlers::move_task))
        // Sprints
        .route(
            "/teams/{team_id}/sprints",
            get(handlers::list_sprints).post(handlers::create_sprint),
        )
        .route(
            "/sprints/{sprint_id}",
            get(handlers::get_sprint)
                .patch(handlers::update_sprint)
                .delete(handlers::delete_sprint),
        )
        .route("/sprints/{sprint_id}/tasks", post(handlers::assign_tasks))
        .route("/sprints/{sprint_id}/start", post(handlers::start_sprint))
        .route("/sprints/{sprint_id}/complete", post(handlers::complete_sprint))
        .route("/sprints/{sprint_id}/summary", get(handlers::sprint_summary))
        // Calendar
        .route(
            "/teams/{team_id}/events",
            get(handlers::list_events).post(handlers::create_event),
        )
        .route(
            "/events/{event_id}",
            get(handlers::get_event)
                .patch(handlers::update_event)
                .delete(handlers::delete_event),
        )
        // Notes
        .route(
            "/teams/{team_id}/notes",
            get(handlers::list_notes).post(handlers::create_note),
        )
        .route(
            "/notes/{note_id}",
            get(handlers::get_note)
                .patch(handlers::update_note)
                .delete(handlers::delete_note),
        )
        // Notifications
        .route("/notifications", get(handlers::list_notifications))
        .route("/notifications/unread-count", get(handlers::unread_count))
        .route("/notifications/read-all", post(handlers::mark_all_read))
        .route("/notifications/{notification_id}", delete(handlers::delete_notification))
        .route("/notifications/{notification_id}/read", post(handlers::mark_read))
        .layer(Extension(service));

    Ok(router)
}
