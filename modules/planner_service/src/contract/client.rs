//! Native client traits for inter-module communication
//!
//! Ideation creates tasks through `PlannerApi`; the server routes identity
//! events into `NotificationApi` and `PlannerApi::purge_team`.

use super::error::PlannerError;
use super::model::{NewNotification, NewTask, Notification, Task};
use async_trait::async_trait;
use brainforge_kit::SecurityCtx;
use uuid::Uuid;

#[async_trait]
pub trait PlannerApi: Send + Sync {
    /// Create a task on behalf of the caller (membership is checked)
    async fn create_task(
        &self,
        ctx: &SecurityCtx,
        team_id: Uuid,
        task: NewTask,
    ) -> Result<Task, PlannerError>;

    /// Unfinished tasks not assigned to any sprint
    async fn backlog(&self, ctx: &SecurityCtx, team_id: Uuid) -> Result<Vec<Task>, PlannerError>;

    /// Delete every planner record of a team
    async fn purge_team(&self, team_id: Uuid) -> Result<(), PlannerError>;
}

#[async_trait]
pub trait NotificationApi: Send + Sync {
    async fn notify(&self, notification: NewNotification) -> Result<Notification, PlannerError>;
}
