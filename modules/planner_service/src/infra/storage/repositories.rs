//! SeaORM repository implementations

use super::entity::{calendar_event, note, notification, sprint, task};
use crate::contract::{CalendarEvent, Note, Notification, SprintPlan, SprintStatus, Task, TaskStatus};
use crate::domain::repository::{
    EventRepository, NoteRepository, NotificationRepository, SprintRepository, TaskRepository,
};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    prelude::Expr, sea_query::Query, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, SqlErr, TransactionTrait,
};
use std::sync::Arc;
use uuid::Uuid;

// ===== Task Repository =====

pub struct SeaOrmTaskRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmTaskRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TaskRepository for SeaOrmTaskRepository {
    async fn create(&self, task: &Task) -> Result<Task> {
        task::ActiveModel::from(task).insert(&*self.db).await?.try_into()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Task>> {
        task::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .map(Task::try_from)
            .transpose()
    }

    async fn list_by_team(&self, team_id: Uuid) -> Result<Vec<Task>> {
        task::Entity::find()
            .filter(task::Column::TeamId.eq(team_id))
            .all(&*self.db)
            .await?
            .into_iter()
            .map(Task::try_from)
            .collect()
    }

    async fn list_column(&self, team_id: Uuid, status: TaskStatus) -> Result<Vec<Task>> {
        task::Entity::find()
            .filter(task::Column::TeamId.eq(team_id))
            .filter(task::Column::Status.eq(status.as_str()))
            .order_by_asc(task::Column::Position)
            .order_by_asc(task::Column::CreatedAt)
            .all(&*self.db)
            .await?
            .into_iter()
            .map(Task::try_from)
            .collect()
    }

    async fn list_by_sprint(&self, sprint_id: Uuid) -> Result<Vec<Task>> {
        task::Entity::find()
            .filter(task::Column::SprintId.eq(sprint_id))
            .order_by_asc(task::Column::Position)
            .all(&*self.db)
            .await?
            .into_iter()
            .map(Task::try_from)
            .collect()
    }

    async fn update(&self, task: &Task) -> Result<Task> {
        task::ActiveModel::from(task).update(&*self.db).await?.try_into()
    }

    async fn update_many(&self, tasks: &[Task]) -> Result<()> {
        if tasks.is_empty() {
            return Ok(());
        }
        let txn = self.db.begin().await?;
        for task in tasks {
            task::ActiveModel::from(task).update(&txn).await?;
        }
        txn.commit().await?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        task::Entity::delete_by_id(id).exec(&*self.db).await?;
        Ok(())
    }

    async fn detach_from_sprint(&self, task_ids: &[Uuid]) -> Result<()> {
        if task_ids.is_empty() {
            return Ok(());
        }
        task::Entity::update_many()
            .col_expr(task::Column::SprintId, Expr::value(Option::<Uuid>::None))
            .col_expr(task::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(task::Column::Id.is_in(task_ids.iter().copied()))
            .exec(&*self.db)
            .await?;
        Ok(())
    }

    async fn delete_by_team(&self, team_id: Uuid) -> Result<u64> {
        let result = task::Entity::delete_many()
            .filter(task::Column::TeamId.eq(team_id))
            .exec(&*self.db)
            .await?;
        Ok(result.rows_affected)
    }
}

// ===== Sprint Repository =====

pub struct SeaOrmSprintRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmSprintRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SprintRepository for SeaOrmSprintRepository {
    async fn create(&self, sprint: &SprintPlan) -> Result<SprintPlan> {
        sprint::ActiveModel::from(sprint).insert(&*self.db).await?.try_into()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<SprintPlan>> {
        sprint::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .map(SprintPlan::try_from)
            .transpose()
    }

    async fn list_by_team(&self, team_id: Uuid) -> Result<Vec<SprintPlan>> {
        sprint::Entity::find()
            .filter(sprint::Column::TeamId.eq(team_id))
            .order_by_desc(sprint::Column::StartDate)
            .order_by_desc(sprint::Column::CreatedAt)
            .all(&*self.db)
            .await?
            .into_iter()
            .map(SprintPlan::try_from)
            .collect()
    }

    async fn update(&self, sprint: &SprintPlan) -> Result<SprintPlan> {
        sprint::ActiveModel::from(sprint).update(&*self.db).await?.try_into()
    }

    async fn activate(&self, sprint_id: Uuid, updated_at: DateTime<Utc>) -> Result<bool> {
        let team_id = match sprint::Entity::find_by_id(sprint_id).one(&*self.db).await? {
            Some(model) => model.team_id,
            None => return Ok(false),
        };

        let active_in_team = Query::select()
            .expr(Expr::val(1))
            .from(sprint::Entity)
            .and_where(Expr::col(sprint::Column::TeamId).eq(team_id))
            .and_where(Expr::col(sprint::Column::Status).eq(SprintStatus::Active.as_str()))
            .to_owned();

        let result = sprint::Entity::update_many()
            .col_expr(sprint::Column::Status, Expr::value(SprintStatus::Active.as_str()))
            .col_expr(sprint::Column::UpdatedAt, Expr::value(updated_at))
            .filter(sprint::Column::Id.eq(sprint_id))
            .filter(sprint::Column::Status.eq(SprintStatus::Planned.as_str()))
            .filter(Expr::exists(active_in_team).not())
            .exec(&*self.db)
            .await;

        match result {
            Ok(result) => Ok(result.rows_affected == 1),
            // A concurrent writer on another connection won the unique index
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        sprint::Entity::delete_by_id(id).exec(&*self.db).await?;
        Ok(())
    }

    async fn delete_by_team(&self, team_id: Uuid) -> Result<u64> {
        let result = sprint::Entity::delete_many()
            .filter(sprint::Column::TeamId.eq(team_id))
            .exec(&*self.db)
            .await?;
        Ok(result.rows_affected)
    }
}

// ===== Calendar Event Repository =====

pub struct SeaOrmEventRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmEventRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl EventRepository for SeaOrmEventRepository {
    async fn create(&self, event: &CalendarEvent) -> Result<CalendarEvent> {
        calendar_event::ActiveModel::from(event)
            .insert(&*self.db)
            .await?
            .try_into()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<CalendarEvent>> {
        calendar_event::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .map(CalendarEvent::try_from)
            .transpose()
    }

    async fn list_in_window(
        &self,
        team_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<CalendarEvent>> {
        calendar_event::Entity::find()
            .filter(calendar_event::Column::TeamId.eq(team_id))
            .filter(calendar_event::Column::StartsAt.lt(to))
            .filter(calendar_event::Column::EndsAt.gte(from))
            .order_by_asc(calendar_event::Column::StartsAt)
            .all(&*self.db)
            .await?
            .into_iter()
            .map(CalendarEvent::try_from)
            .collect()
    }

    async fn update(&self, event: &CalendarEvent) -> Result<CalendarEvent> {
        calendar_event::ActiveModel::from(event)
            .update(&*self.db)
            .await?
            .try_into()
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        calendar_event::Entity::delete_by_id(id).exec(&*self.db).await?;
        Ok(())
    }

    async fn delete_by_team(&self, team_id: Uuid) -> Result<u64> {
        let result = calendar_event::Entity::delete_many()
            .filter(calendar_event::Column::TeamId.eq(team_id))
            .exec(&*self.db)
            .await?;
        Ok(result.rows_affected)
    }
}

// ===== Note Repository =====

pub struct SeaOrmNoteRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmNoteRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl NoteRepository for SeaOrmNoteRepository {
    async fn create(&self, note: &Note) -> Result<Note> {
        note::ActiveModel::from(note).insert(&*self.db).await?.try_into()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Note>> {
        note::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .map(Note::try_from)
            .transpose()
    }

    async fn list_by_team(&self, team_id: Uuid) -> Result<Vec<Note>> {
        note::Entity::find()
            .filter(note::Column::TeamId.eq(team_id))
            .order_by_desc(note::Column::Pinned)
            .order_by_desc(note::Column::UpdatedAt)
            .all(&*self.db)
            .await?
            .into_iter()
            .map(Note::try_from)
            .collect()
    }

    async fn update(&self, note: &Note) -> Result<Note> {
        note::ActiveModel::from(note).update(&*self.db).await?.try_into()
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        note::Entity::delete_by_id(id).exec(&*self.db).await?;
        Ok(())
    }

    async fn delete_by_team(&self, team_id: Uuid) -> Result<u64> {
        let result = note::Entity::delete_many()
            .filter(note::Column::TeamId.eq(team_id))
            .exec(&*self.db)
            .await?;
        Ok(result.rows_affected)
    }
}

// ===== Notification Repository =====

pub struct SeaOrmNotificationRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmNotificationRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    fn for_user(user_id: Uuid, unread_only: bool) -> sea_orm::Select<notification::Entity> {
        let query = notification::Entity::find().filter(notification::Column::UserId.eq(user_id));
        if unread_only {
            query.filter(notification::Column::ReadAt.is_null())
        } else {
            query
        }
    }
}

#[async_trait]
impl NotificationRepository for SeaOrmNotificationRepository {
    async fn create(&self, notification: &Notification) -> Result<Notification> {
        let model = notification::ActiveModel::from(notification)
            .insert(&*self.db)
            .await?;
        Ok(model.into())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Notification>> {
        Ok(notification::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .map(Notification::from))
    }

    async fn list_for_user(
        &self,
        user_id: Uuid,
        unread_only: bool,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<Notification>> {
        Ok(Self::for_user(user_id, unread_only)
            .order_by_desc(notification::Column::CreatedAt)
            .limit(limit)
            .offset(offset)
            .all(&*self.db)
            .await?
            .into_iter()
            .map(Notification::from)
            .collect())
    }

    async fn count_for_user(&self, user_id: Uuid, unread_only: bool) -> Result<u64> {
        Ok(Self::for_user(user_id, unread_only).count(&*self.db).await?)
    }

    async fn mark_read(&self, id: Uuid, at: DateTime<Utc>) -> Result<()> {
        notification::Entity::update_many()
            .col_expr(notification::Column::ReadAt, Expr::value(at))
            .filter(notification::Column::Id.eq(id))
            .filter(notification::Column::ReadAt.is_null())
            .exec(&*self.db)
            .await?;
        Ok(())
    }

    async fn mark_all_read(&self, user_id: Uuid, at: DateTime<Utc>) -> Result<u64> {
        let result = notification::Entity::update_many()
            .col_expr(notification::Column::ReadAt, Expr::value(at))
            .filter(notification::Column::UserId.eq(user_id))
            .filter(notification::Column::ReadAt.is_null())
            .exec(&*self.db)
            .await?;
        Ok(result.rows_affected)
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        notification::Entity::delete_by_id(id).exec(&*self.db).await?;
        Ok(())
    }
}
