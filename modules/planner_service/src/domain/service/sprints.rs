use super::{internal, Service};
use crate::contract::{
    NewSprint, PlannerError, SprintPatch, SprintPlan, SprintStatus, SprintSummary, Task, TaskStatus,
};
use crate::domain::events::{ChangeKind, PlannerEvent};
use crate::domain::validation::{normalize_text, validate_title};
use brainforge_kit::SecurityCtx;
use chrono::{NaiveDate, Utc};
use uuid::Uuid;

const MAX_GOAL_LENGTH: usize = 2_000;

impl Service {
    pub async fn create_sprint(
        &self,
        ctx: &SecurityCtx,
        team_id: Uuid,
        new_sprint: NewSprint,
    ) -> Result<SprintPlan, PlannerError> {
        self.member(ctx, team_id).await?;

        let name = validate_title(&new_sprint.name, "sprint")?;
        let goal = normalize_text(new_sprint.goal, MAX_GOAL_LENGTH)?;
        validate_dates(new_sprint.start_date, new_sprint.end_date)?;

        let now = Utc::now();
        let sprint = SprintPlan {
            id: Uuid::new_v4(),
            team_id,
            name,
            goal,
            start_date: new_sprint.start_date,
            end_date: new_sprint.end_date,
            status: SprintStatus::Planned,
            created_by: ctx.user_id,
            created_at: now,
            updated_at: now,
        };

        let sprint = self.repos.sprints.create(&sprint).await.map_err(internal)?;
        tracing::info!(sprint_id = %sprint.id, team_id = %team_id, "sprint created");
        self.publish_sprint(ctx, &sprint, ChangeKind::Created).await;

        Ok(sprint)
    }

    /// Sprints of a team, newest start date first
    pub async fn list_sprints(&self, ctx: &SecurityCtx, team_id: Uuid) -> Result<Vec<SprintPlan>, PlannerError> {
        self.member(ctx, team_id).await?;
        self.repos.sprints.list_by_team(team_id).await.map_err(internal)
    }

    pub async fn get_sprint(&self, ctx: &SecurityCtx, sprint_id: Uuid) -> Result<SprintPlan, PlannerError> {
        let sprint = self.find_sprint(sprint_id).await?;
        self.member(ctx, sprint.team_id).await?;
        Ok(sprint)
    }

    pub async fn update_sprint(
        &self,
        ctx: &SecurityCtx,
        sprint_id: Uuid,
        patch: SprintPatch,
    ) -> Result<SprintPlan, PlannerError> {
        let mut sprint = self.get_sprint(ctx, sprint_id).await?;
        if sprint.status == SprintStatus::Completed {
            return Err(PlannerError::conflict("a completed sprint cannot be changed"));
        }

        if let Some(name) = patch.name {
            sprint.name = validate_title(&name, "sprint")?;
        }
        if let Some(goal) = patch.goal {
            sprint.goal = normalize_text(goal, MAX_GOAL_LENGTH)?;
        }
        if let Some(start_date) = patch.start_date {
            sprint.start_date = start_date;
        }
        if let Some(end_date) = patch.end_date {
            sprint.end_date = end_date;
        }
        validate_dates(sprint.start_date, sprint.end_date)?;
        sprint.updated_at = Utc::now();

        let sprint = self.repos.sprints.update(&sprint).await.map_err(internal)?;
        self.publish_sprint(ctx, &sprint, ChangeKind::Updated).await;
        Ok(sprint)
    }

    /// Team owner/admin only. Tasks of the sprint go back to the backlog.
    pub async fn delete_sprint(&self, ctx: &SecurityCtx, sprint_id: Uuid) -> Result<(), PlannerError> {
        let sprint = self.find_sprint(sprint_id).await?;
        self.require_manager(ctx, sprint.team_id).await?;

        let task_ids: Vec<Uuid> = self.sprint_tasks(sprint.id).await?.iter().map(|t| t.id).collect();
        self.repos.tasks.detach_from_sprint(&task_ids).await.map_err(internal)?;
        self.repos.sprints.delete(sprint.id).await.map_err(internal)?;

        tracing::info!(sprint_id = %sprint.id, detached = task_ids.len(), "sprint deleted");
        self.publish_sprint(ctx, &sprint, ChangeKind::Deleted).await;
        Ok(())
    }

    /// Put tasks of the same team into the sprint
    pub async fn assign_tasks(
        &self,
        ctx: &SecurityCtx,
        sprint_id: Uuid,
        task_ids: Vec<Uuid>,
    ) -> Result<Vec<Task>, PlannerError> {
        let sprint = self.get_sprint(ctx, sprint_id).await?;
        if sprint.status == SprintStatus::Completed {
            return Err(PlannerError::conflict("cannot add tasks to a completed sprint"));
        }

        let mut tasks = Vec::with_capacity(task_ids.len());
        for task_id in task_ids {
            let task = self.find_task(task_id).await?;
            if task.team_id != sprint.team_id {
                return Err(PlannerError::validation(format!(
                    "task {} does not belong to the sprint's team",
                    task_id
                )));
            }
            if !tasks.iter().any(|t: &Task| t.id == task.id) {
                tasks.push(task);
            }
        }

        let now = Utc::now();
        for task in tasks.iter_mut() {
            task.sprint_id = Some(sprint.id);
            task.updated_at = now;
        }
        self.repos.tasks.update_many(&tasks).await.map_err(internal)?;

        tracing::info!(sprint_id = %sprint.id, count = tasks.len(), "tasks assigned to sprint");
        self.publish_sprint(ctx, &sprint, ChangeKind::Updated).await;
        Ok(tasks)
    }

    /// Team owner/admin only; one active sprint per team
    pub async fn start_sprint(&self, ctx: &SecurityCtx, sprint_id: Uuid) -> Result<SprintPlan, PlannerError> {
        let team_id = self.find_sprint(sprint_id).await?.team_id;
        self.require_manager(ctx, team_id).await?;

        let _guard = self.lock_team(team_id).await;
        let mut sprint = self.find_sprint(sprint_id).await?;
        if sprint.status != SprintStatus::Planned {
            return Err(PlannerError::conflict(format!(
                "sprint is {}, only planned sprints can start",
                sprint.status.as_str()
            )));
        }

        let now = Utc::now();
        let started = self
            .repos
            .sprints
            .activate(sprint.id, now)
            .await
            .map_err(internal)?;
        if !started {
            return Err(PlannerError::conflict("team already has an active sprint"));
        }
        sprint.status = SprintStatus::Active;
        sprint.updated_at = now;

        tracing::info!(sprint_id = %sprint.id, team_id = %sprint.team_id, "sprint started");
        self.publish_sprint(ctx, &sprint, ChangeKind::Updated).await;
        Ok(sprint)
    }

    /// Team owner/admin only. Unfinished tasks go back to the backlog.
    pub async fn complete_sprint(&self, ctx: &SecurityCtx, sprint_id: Uuid) -> Result<SprintPlan, PlannerError> {
        let team_id = self.find_sprint(sprint_id).await?.team_id;
        self.require_manager(ctx, team_id).await?;

        let _guard = self.lock_team(team_id).await;
        let mut sprint = self.find_sprint(sprint_id).await?;

        if sprint.status != SprintStatus::Active {
            return Err(PlannerError::conflict(format!(
                "sprint is {}, only active sprints can complete",
                sprint.status.as_str()
            )));
        }

        let unfinished: Vec<Uuid> = self
            .sprint_tasks(sprint.id)
            .await?
            .iter()
            .filter(|t| t.status != TaskStatus::Done)
            .map(|t| t.id)
            .collect();
        self.repos.tasks.detach_from_sprint(&unfinished).await.map_err(internal)?;

        sprint.status = SprintStatus::Completed;
        sprint.updated_at = Utc::now();
        let sprint = self.repos.sprints.update(&sprint).await.map_err(internal)?;

        tracing::info!(
            sprint_id = %sprint.id,
            returned_to_backlog = unfinished.len(),
            "sprint completed"
        );
        self.publish_sprint(ctx, &sprint, ChangeKind::Updated).await;
        Ok(sprint)
    }

    pub async fn sprint_summary(&self, ctx: &SecurityCtx, sprint_id: Uuid) -> Result<SprintSummary, PlannerError> {
        let sprint = self.get_sprint(ctx, sprint_id).await?;
        let tasks = self.sprint_tasks(sprint.id).await?;
        Ok(summarize(&sprint, &tasks, Utc::now().date_naive()))
    }

    // ===== Helpers =====

    async fn find_sprint(&self, sprint_id: Uuid) -> Result<SprintPlan, PlannerError> {
        self.repos
            .sprints
            .find_by_id(sprint_id)
            .await
            .map_err(internal)?
            .ok_or_else(|| PlannerError::not_found("sprint", sprint_id))
    }

    async fn sprint_tasks(&self, sprint_id: Uuid) -> Result<Vec<Task>, PlannerError> {
        self.repos.tasks.list_by_sprint(sprint_id).await.map_err(internal)
    }

    async fn publish_sprint(&self, ctx: &SecurityCtx, sprint: &SprintPlan, change: ChangeKind) {
        self.publish(PlannerEvent::Sprint {
            team_id: sprint.team_id,
            sprint_id: sprint.id,
            change,
            actor_id: ctx.user_id,
            timestamp: Utc::now(),
        })
        .await;
    }
}

fn validate_dates(start: NaiveDate, end: NaiveDate) -> Result<(), PlannerError> {
    if end <= start {
        return Err(PlannerError::validation("sprint end date must be after its start date"));
    }
    Ok(())
}

fn summarize(sprint: &SprintPlan, tasks: &[Task], today: NaiveDate) -> SprintSummary {
    let count = |status: TaskStatus| tasks.iter().filter(|t| t.status == status).count() as u32;
    let total = tasks.len() as u32;
    let done = count(TaskStatus::Done);

    SprintSummary {
        sprint_id: sprint.id,
        status: sprint.status,
        total,
        todo: count(TaskStatus::Todo),
        in_progress: count(TaskStatus::InProgress),
        review: count(TaskStatus::Review),
        done,
        completion_percent: if total == 0 {
            0.0
        } else {
            f64::from(done) * 100.0 / f64::from(total)
        },
        days_remaining: (sprint.end_date - today).num_days().max(0),
    }
}
