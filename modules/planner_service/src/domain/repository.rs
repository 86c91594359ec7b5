//! Repository traits for data access
//!
//! Implementations are in infra/storage/repositories.rs

use crate::contract::{
    CalendarEvent, Note, Notification, SprintPlan, Task, TaskStatus,
};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

#[async_trait]
pub trait TaskRepository: Send + Sync {
    async fn create(&self, task: &Task) -> Result<Task>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Task>>;

    /// All tasks of a team, unordered
    async fn list_by_team(&self, team_id: Uuid) -> Result<Vec<Task>>;

    /// Tasks of one status column, ordered by position
    async fn list_column(&self, team_id: Uuid, status: TaskStatus) -> Result<Vec<Task>>;

    async fn list_by_sprint(&self, sprint_id: Uuid) -> Result<Vec<Task>>;

    async fn update(&self, task: &Task) -> Result<Task>;

    /// Persist several tasks in one transaction (column renumbering)
    async fn update_many(&self, tasks: &[Task]) -> Result<()>;

    async fn delete(&self, id: Uuid) -> Result<()>;

    /// Clear `sprint_id` on the given tasks
    async fn detach_from_sprint(&self, task_ids: &[Uuid]) -> Result<()>;

    async fn delete_by_team(&self, team_id: Uuid) -> Result<u64>;
}

#[async_trait]
pub trait SprintRepository: Send + Sync {
    async fn create(&self, sprint: &SprintPlan) -> Result<SprintPlan>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<SprintPlan>>;

    /// Sprints of a team, newest start date first
    async fn list_by_team(&self, team_id: Uuid) -> Result<Vec<SprintPlan>>;

    async fn update(&self, sprint: &SprintPlan) -> Result<SprintPlan>;

    /// Flip a planned sprint to active, stamping `updated_at`.
    ///
    /// Returns `false` and changes nothing when the sprint is no longer
    /// planned or its team already has an active sprint.
    async fn activate(&self, sprint_id: Uuid, updated_at: DateTime<Utc>) -> Result<bool>;

    async fn delete(&self, id: Uuid) -> Result<()>;

    async fn delete_by_team(&self, team_id: Uuid) -> Result<u64>;
}

#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn create(&self, event: &CalendarEvent) -> Result<CalendarEvent>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<CalendarEvent>>;

    /// Candidate events for a window: `starts_at < to` and `ends_at >= from`,
    /// ordered by start
    async fn list_in_window(
        &self,
        team_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<CalendarEvent>>;

    async fn update(&self, event: &CalendarEvent) -> Result<CalendarEvent>;

    async fn delete(&self, id: Uuid) -> Result<()>;

    async fn delete_by_team(&self, team_id: Uuid) -> Result<u64>;
}

#[async_trait]
pub trait NoteRepository: Send + Sync {
    async fn create(&self, note: &Note) -> Result<Note>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Note>>;

    /// Notes of a team, pinned first then most recently updated
    async fn list_by_team(&self, team_id: Uuid) -> Result<Vec<Note>>;

    async fn update(&self, note: &Note) -> Result<Note>;

    async fn delete(&self, id: Uuid) -> Result<()>;

    async fn delete_by_team(&self, team_id: Uuid) -> Result<u64>;
}

#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn create(&self, notification: &Notification) -> Result<Notification>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Notification>>;

    /// Newest first
    async fn list_for_user(
        &self,
        user_id: Uuid,
        unread_only: bool,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<Notification>>;

    async fn count_for_user(&self, user_id: Uuid, unread_only: bool) -> Result<u64>;

    async fn mark_read(&self, id: Uuid, at: DateTime<Utc>) -> Result<()>;

    /// Returns the number of notifications that were unread
    async fn mark_all_read(&self, user_id: Uuid, at: DateTime<Utc>) -> Result<u64>;

    async fn delete(&self, id: Uuid) -> Result<()>;
}
