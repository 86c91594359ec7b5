//! Domain service - business logic orchestration
//!
//! One `Service` covers the whole planner; its operations are split by
//! aggregate into the submodules below.

mod calendar;
mod notes;
mod notifications;
mod sprints;
mod tasks;

use super::events::{PlannerEvent, PlannerEventSink};
use super::repository::{
    EventRepository, NoteRepository, NotificationRepository, SprintRepository, TaskRepository,
};
use crate::config::Config;
use crate::contract::PlannerError;
use brainforge_kit::SecurityCtx;
use dashmap::DashMap;
use identity_service::{IdentityApi, TeamRole};
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

/// Log a repository failure and hide it behind `Internal`
pub(crate) fn internal(error: anyhow::Error) -> PlannerError {
    tracing::error!(error = ?error, "planner storage failure");
    PlannerError::Internal
}

/// Repository handles the service works with
#[derive(Clone)]
pub struct Repositories {
    pub tasks: Arc<dyn TaskRepository>,
    pub sprints: Arc<dyn SprintRepository>,
    pub events: Arc<dyn EventRepository>,
    pub notes: Arc<dyn NoteRepository>,
    pub notifications: Arc<dyn NotificationRepository>,
}

/// Domain service for the planner
pub struct Service {
    repos: Repositories,
    identity: Arc<dyn IdentityApi>,
    sink: Arc<dyn PlannerEventSink>,
    config: Config,
    /// Serializes column renumbering and sprint state changes per team
    team_locks: DashMap<Uuid, Arc<Mutex<()>>>,
}

impl Service {
    pub fn new(
        repos: Repositories,
        identity: Arc<dyn IdentityApi>,
        sink: Arc<dyn PlannerEventSink>,
        config: Config,
    ) -> Self {
        Self {
            repos,
            identity,
            sink,
            config,
            team_locks: DashMap::new(),
        }
    }

    /// Delete every task, sprint, calendar event and note of a team
    pub async fn purge_team(&self, team_id: Uuid) -> Result<(), PlannerError> {
        let tasks = self.repos.tasks.delete_by_team(team_id).await.map_err(internal)?;
        let sprints = self.repos.sprints.delete_by_team(team_id).await.map_err(internal)?;
        let events = self.repos.events.delete_by_team(team_id).await.map_err(internal)?;
        let notes = self.repos.notes.delete_by_team(team_id).await.map_err(internal)?;
        self.team_locks.remove(&team_id);

        tracing::info!(
            team_id = %team_id,
            tasks,
            sprints,
            events,
            notes,
            "purged planner data of deleted team"
        );
        Ok(())
    }

    // ===== Helper Methods =====

    /// Held across read-renumber-write cycles on a team's board and sprints
    async fn lock_team(&self, team_id: Uuid) -> OwnedMutexGuard<()> {
        let lock = self.team_locks.entry(team_id).or_default().clone();
        lock.lock_owned().await
    }

    /// Caller's role in the team; `NotFound`/`Forbidden` otherwise
    async fn member(&self, ctx: &SecurityCtx, team_id: Uuid) -> Result<TeamRole, PlannerError> {
        Ok(self.identity.require_member(team_id, ctx.user_id).await?)
    }

    /// Authors may edit their own records; team owners and admins may edit any
    async fn require_author_or_manager(
        &self,
        ctx: &SecurityCtx,
        team_id: Uuid,
        author_id: Uuid,
        what: &str,
    ) -> Result<(), PlannerError> {
        let role = self.member(ctx, team_id).await?;
        if author_id == ctx.user_id || role.can_manage() {
            Ok(())
        } else {
            Err(PlannerError::forbidden(format!(
                "only the author or a team owner/admin can change this {}",
                what
            )))
        }
    }

    async fn require_manager(&self, ctx: &SecurityCtx, team_id: Uuid) -> Result<(), PlannerError> {
        if self.member(ctx, team_id).await?.can_manage() {
            Ok(())
        } else {
            Err(PlannerError::forbidden("team owner or admin role required"))
        }
    }

    /// `user_id` must belong to the team to be assigned or invited
    async fn require_team_user(&self, team_id: Uuid, user_id: Uuid, what: &str) -> Result<(), PlannerError> {
        match self.identity.team_role(team_id, user_id).await? {
            Some(_) => Ok(()),
            None => Err(PlannerError::validation(format!(
                "{} {} is not a member of this team",
                what, user_id
            ))),
        }
    }

    /// Events never fail the operation that produced them
    async fn publish(&self, event: PlannerEvent) {
        let name = event.name();
        if let Err(e) = self.sink.publish(event).await {
            tracing::warn!(event = %name, error = %e, "failed to publish planner event");
        }
    }
}
