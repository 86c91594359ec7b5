//! Native client implementation - wraps domain service for in-process calls

use crate::contract::{NewNotification, NewTask, NotificationApi, Notification, PlannerApi, PlannerError, Task};
use crate::domain::Service;
use async_trait::async_trait;
use brainforge_kit::SecurityCtx;
use std::sync::Arc;
use uuid::Uuid;

/// Native client that directly calls the domain service.
///
/// Ideation turns brainstorm ideas into tasks through it; the server's
/// identity event bridge uses it for notifications and team purges.
#[derive(Clone)]
pub struct NativeClient {
    service: Arc<Service>,
}

impl NativeClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl PlannerApi for NativeClient {
    async fn create_task(&self, ctx: &SecurityCtx, team_id: Uuid, task: NewTask) -> Result<Task, PlannerError> {
        self.service.create_task(ctx, team_id, task).await
    }

    async fn backlog(&self, ctx: &SecurityCtx, team_id: Uuid) -> Result<Vec<Task>, PlannerError> {
        self.service.backlog(ctx, team_id).await
    }

    async fn purge_team(&self, team_id: Uuid) -> Result<(), PlannerError> {
        self.service.purge_team(team_id).await
    }
}

#[async_trait]
impl NotificationApi for NativeClient {
    async fn notify(&self, notification: NewNotification) -> Result<Notification, PlannerError> {
        self.service.notify(notification).await
    }
}
