use super::{internal, Service};
use crate::contract::{
    BoardColumn, NewNotification, NewTask, PlannerError, SprintStatus, Task, TaskFilter,
    TaskPatch, TaskStatus,
};
use crate::domain::events::{ChangeKind, PlannerEvent};
use crate::domain::validation::{matches_search, normalize_tags, normalize_text, validate_title};
use brainforge_kit::SecurityCtx;
use chrono::Utc;
use uuid::Uuid;

impl Service {
    pub async fn create_task(
        &self,
        ctx: &SecurityCtx,
        team_id: Uuid,
        new_task: NewTask,
    ) -> Result<Task, PlannerError> {
        self.member(ctx, team_id).await?;

        let title = validate_title(&new_task.title, "task")?;
        let description = normalize_text(new_task.description, self.config.max_body_length)?;
        let tags = normalize_tags(new_task.tags, self.config.max_tags)?;
        if let Some(assignee_id) = new_task.assignee_id {
            self.require_team_user(team_id, assignee_id, "assignee").await?;
        }
        if let Some(sprint_id) = new_task.sprint_id {
            self.open_sprint(team_id, sprint_id).await?;
        }

        let status = new_task.status.unwrap_or(TaskStatus::Todo);
        let guard = self.lock_team(team_id).await;
        let column = self
            .repos
            .tasks
            .list_column(team_id, status)
            .await
            .map_err(internal)?;

        let now = Utc::now();
        let task = Task {
            id: Uuid::new_v4(),
            team_id,
            title,
            description,
            status,
            priority: new_task.priority.unwrap_or_default(),
            assignee_id: new_task.assignee_id,
            creator_id: ctx.user_id,
            sprint_id: new_task.sprint_id,
            due_date: new_task.due_date,
            position: column.len() as i32,
            tags,
            created_at: now,
            updated_at: now,
            completed_at: (status == TaskStatus::Done).then_some(now),
        };

        let task = self.repos.tasks.create(&task).await.map_err(internal)?;
        drop(guard);
        tracing::info!(task_id = %task.id, team_id = %team_id, status = status.as_str(), "task created");

        if let Some(assignee_id) = task.assignee_id {
            self.notify_assignment(ctx, &task, assignee_id).await;
        }
        self.publish_task(ctx, &task, ChangeKind::Created).await;

        Ok(task)
    }

    /// Tasks of a team ordered by status column, then position
    pub async fn list_tasks(
        &self,
        ctx: &SecurityCtx,
        team_id: Uuid,
        filter: TaskFilter,
    ) -> Result<Vec<Task>, PlannerError> {
        self.member(ctx, team_id).await?;

        let mut tasks: Vec<Task> = self
            .repos
            .tasks
            .list_by_team(team_id)
            .await
            .map_err(internal)?
            .into_iter()
            .filter(|t| filter.status.is_none_or(|s| t.status == s))
            .filter(|t| filter.assignee_id.is_none_or(|a| t.assignee_id == Some(a)))
            .filter(|t| filter.sprint_id.is_none_or(|s| t.sprint_id == Some(s)))
            .filter(|t| {
                filter
                    .search
                    .as_deref()
                    .is_none_or(|q| matches_search(q, &[Some(&t.title), t.description.as_deref()]))
            })
            .collect();

        tasks.sort_by_key(|t| (t.status, t.position));
        Ok(tasks)
    }

    pub async fn get_task(&self, ctx: &SecurityCtx, task_id: Uuid) -> Result<Task, PlannerError> {
        let task = self.find_task(task_id).await?;
        self.member(ctx, task.team_id).await?;
        Ok(task)
    }

    pub async fn update_task(
        &self,
        ctx: &SecurityCtx,
        task_id: Uuid,
        patch: TaskPatch,
    ) -> Result<Task, PlannerError> {
        let team_id = self.get_task(ctx, task_id).await?.team_id;
        let guard = self.lock_team(team_id).await;
        let mut task = self.find_task(task_id).await?;
        let previous_assignee = task.assignee_id;

        if let Some(title) = patch.title {
            task.title = validate_title(&title, "task")?;
        }
        if let Some(description) = patch.description {
            task.description = normalize_text(description, self.config.max_body_length)?;
        }
        if let Some(priority) = patch.priority {
            task.priority = priority;
        }
        if let Some(assignee_id) = patch.assignee_id {
            if let Some(user_id) = assignee_id {
                self.require_team_user(task.team_id, user_id, "assignee").await?;
            }
            task.assignee_id = assignee_id;
        }
        if let Some(sprint_id) = patch.sprint_id {
            if let Some(sprint_id) = sprint_id {
                self.open_sprint(task.team_id, sprint_id).await?;
            }
            task.sprint_id = sprint_id;
        }
        if let Some(due_date) = patch.due_date {
            task.due_date = due_date;
        }
        if let Some(tags) = patch.tags {
            task.tags = normalize_tags(tags, self.config.max_tags)?;
        }
        task.updated_at = Utc::now();

        let task = match patch.status {
            Some(status) if status != task.status => self.relocate(task, status, None).await?,
            _ => self.repos.tasks.update(&task).await.map_err(internal)?,
        };
        drop(guard);

        if let Some(assignee_id) = task.assignee_id.filter(|a| Some(*a) != previous_assignee) {
            self.notify_assignment(ctx, &task, assignee_id).await;
        }
        self.publish_task(ctx, &task, ChangeKind::Updated).await;

        Ok(task)
    }

    /// Move a task to `position` in the `status` column.
    ///
    /// Positions past the end of the column append. Both affected columns are
    /// renumbered densely from 0.
    pub async fn move_task(
        &self,
        ctx: &SecurityCtx,
        task_id: Uuid,
        status: TaskStatus,
        position: i32,
    ) -> Result<Task, PlannerError> {
        if position < 0 {
            return Err(PlannerError::validation("position must not be negative"));
        }
        let team_id = self.get_task(ctx, task_id).await?.team_id;

        let guard = self.lock_team(team_id).await;
        let task = self.find_task(task_id).await?;
        let task = self.relocate(task, status, Some(position as usize)).await?;
        drop(guard);
        tracing::debug!(task_id = %task.id, status = status.as_str(), position = task.position, "task moved");
        self.publish_task(ctx, &task, ChangeKind::Moved).await;

        Ok(task)
    }

    /// Creator or team owner/admin only
    pub async fn delete_task(&self, ctx: &SecurityCtx, task_id: Uuid) -> Result<(), PlannerError> {
        let task = self.find_task(task_id).await?;
        self.require_author_or_manager(ctx, task.team_id, task.creator_id, "task")
            .await?;

        let guard = self.lock_team(task.team_id).await;
        let task = self.find_task(task_id).await?;
        self.repos.tasks.delete(task.id).await.map_err(internal)?;

        let mut column = self
            .repos
            .tasks
            .list_column(task.team_id, task.status)
            .await
            .map_err(internal)?;
        let changed = renumber(&mut column);
        self.repos.tasks.update_many(&changed).await.map_err(internal)?;
        drop(guard);

        tracing::info!(task_id = %task.id, team_id = %task.team_id, "task deleted");
        self.publish_task(ctx, &task, ChangeKind::Deleted).await;
        Ok(())
    }

    /// All tasks of a team grouped into the four kanban columns
    pub async fn board(&self, ctx: &SecurityCtx, team_id: Uuid) -> Result<Vec<BoardColumn>, PlannerError> {
        let tasks = self.list_tasks(ctx, team_id, TaskFilter::default()).await?;

        Ok(TaskStatus::ALL
            .iter()
            .map(|status| BoardColumn {
                status: *status,
                tasks: tasks.iter().filter(|t| t.status == *status).cloned().collect(),
            })
            .collect())
    }

    /// Unfinished tasks that are not planned into any sprint
    pub async fn backlog(&self, ctx: &SecurityCtx, team_id: Uuid) -> Result<Vec<Task>, PlannerError> {
        let tasks = self.list_tasks(ctx, team_id, TaskFilter::default()).await?;
        Ok(tasks
            .into_iter()
            .filter(|t| t.status != TaskStatus::Done && t.sprint_id.is_none())
            .collect())
    }

    // ===== Helpers =====

    pub(super) async fn find_task(&self, task_id: Uuid) -> Result<Task, PlannerError> {
        self.repos
            .tasks
            .find_by_id(task_id)
            .await
            .map_err(internal)?
            .ok_or_else(|| PlannerError::not_found("task", task_id))
    }

    /// A sprint of this team that can still take tasks
    async fn open_sprint(&self, team_id: Uuid, sprint_id: Uuid) -> Result<(), PlannerError> {
        let sprint = self
            .repos
            .sprints
            .find_by_id(sprint_id)
            .await
            .map_err(internal)?
            .filter(|s| s.team_id == team_id)
            .ok_or_else(|| PlannerError::validation(format!("sprint {} does not belong to this team", sprint_id)))?;

        if sprint.status == SprintStatus::Completed {
            return Err(PlannerError::conflict("cannot add tasks to a completed sprint"));
        }
        Ok(())
    }

    /// Put `task` into `status` at `position` (end when `None`) and persist
    /// every task whose position changed. Callers hold the team lock.
    async fn relocate(
        &self,
        mut task: Task,
        status: TaskStatus,
        position: Option<usize>,
    ) -> Result<Task, PlannerError> {
        let from_status = task.status;
        let task_id = task.id;
        let now = Utc::now();

        let mut target: Vec<Task> = self
            .repos
            .tasks
            .list_column(task.team_id, status)
            .await
            .map_err(internal)?
            .into_iter()
            .filter(|t| t.id != task_id)
            .collect();

        match (from_status == TaskStatus::Done, status == TaskStatus::Done) {
            (false, true) => task.completed_at = Some(now),
            (true, false) => task.completed_at = None,
            _ => {}
        }
        task.status = status;
        task.updated_at = now;
        // Force the moved task into the changed set
        task.position = -1;

        let index = position.unwrap_or(target.len()).min(target.len());
        let team_id = task.team_id;
        target.insert(index, task);
        let mut changed = renumber(&mut target);

        if from_status != status {
            let mut source: Vec<Task> = self
                .repos
                .tasks
                .list_column(team_id, from_status)
                .await
                .map_err(internal)?
                .into_iter()
                .filter(|t| t.id != task_id)
                .collect();
            changed.extend(renumber(&mut source));
        }

        self.repos.tasks.update_many(&changed).await.map_err(internal)?;

        target
            .into_iter()
            .find(|t| t.id == task_id)
            .ok_or(PlannerError::Internal)
    }

    async fn notify_assignment(&self, ctx: &SecurityCtx, task: &Task, assignee_id: Uuid) {
        if assignee_id == ctx.user_id {
            return;
        }
        let notification = NewNotification {
            user_id: assignee_id,
            kind: "task_assigned".to_string(),
            title: "You were assigned a task".to_string(),
            body: task.title.clone(),
            link: Some(format!("/teams/{}/tasks/{}", task.team_id, task.id)),
        };
        if let Err(e) = self.notify(notification).await {
            tracing::warn!(task_id = %task.id, error = %e, "failed to notify assignee");
        }
    }

    async fn publish_task(&self, ctx: &SecurityCtx, task: &Task, change: ChangeKind) {
        self.publish(PlannerEvent::Task {
            team_id: task.team_id,
            task_id: task.id,
            change,
            actor_id: ctx.user_id,
            timestamp: Utc::now(),
        })
        .await;
    }
}

/// Assign positions 0..n in order; returns the tasks whose position changed
fn renumber(column: &mut [Task]) -> Vec<Task> {
    let mut changed = Vec::new();
    for (index, task) in column.iter_mut().enumerate() {
        let position = index as i32;
        if task.position != position {
            task.position = position;
            changed.push(task.clone());
        }
    }
    changed
}
