//! Domain service - business logic orchestration
//!
//! Sessions and diagrams are plain team-scoped records; the AI assists in
//! `assist` call the gateway on behalf of the caller, so usage is metered
//! against their keys.

mod assist;
mod diagrams;
mod sessions;

use super::events::{IdeationEvent, IdeationEventSink};
use super::repository::{DiagramRepository, SessionRepository};
use crate::config::Config;
use crate::contract::IdeationError;
use ai_gateway::{AiGatewayApi, ChatCompletion, ChatRequest, ProviderKind};
use brainforge_kit::SecurityCtx;
use identity_service::{IdentityApi, TeamRole};
use planner_service::PlannerApi;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Log a repository failure and hide it behind `Internal`
pub(crate) fn internal(error: anyhow::Error) -> IdeationError {
    tracing::error!(error = ?error, "ideation storage failure");
    IdeationError::Internal
}

/// Domain service for brainstorming and diagrams
pub struct Service {
    sessions: Arc<dyn SessionRepository>,
    diagrams: Arc<dyn DiagramRepository>,
    identity: Arc<dyn IdentityApi>,
    planner: Arc<dyn PlannerApi>,
    ai: Arc<dyn AiGatewayApi>,
    sink: Arc<dyn IdeationEventSink>,
    config: Config,
    /// Serializes read-modify-write cycles on a session's idea list
    session_writes: Mutex<()>,
}

impl Service {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        sessions: Arc<dyn SessionRepository>,
        diagrams: Arc<dyn DiagramRepository>,
        identity: Arc<dyn IdentityApi>,
        planner: Arc<dyn PlannerApi>,
        ai: Arc<dyn AiGatewayApi>,
        sink: Arc<dyn IdeationEventSink>,
        config: Config,
    ) -> Self {
        Self {
            sessions,
            diagrams,
            identity,
            planner,
            ai,
            sink,
            config,
            session_writes: Mutex::new(()),
        }
    }

    /// Delete every brainstorm session and diagram of a team
    pub async fn purge_team(&self, team_id: Uuid) -> Result<(), IdeationError> {
        let sessions = self.sessions.delete_by_team(team_id).await.map_err(internal)?;
        let diagrams = self.diagrams.delete_by_team(team_id).await.map_err(internal)?;
        tracing::info!(team_id = %team_id, sessions, diagrams, "purged ideation data of deleted team");
        Ok(())
    }

    /// Owning team of a session, without a membership check
    pub async fn session_team(&self, session_id: Uuid) -> Result<Uuid, IdeationError> {
        Ok(self.find_session(session_id).await?.team_id)
    }

    // ===== Helper Methods =====

    async fn member(&self, ctx: &SecurityCtx, team_id: Uuid) -> Result<TeamRole, IdeationError> {
        Ok(self.identity.require_member(team_id, ctx.user_id).await?)
    }

    /// Creators may change their own records; team owners and admins may change any
    async fn require_creator_or_manager(
        &self,
        ctx: &SecurityCtx,
        team_id: Uuid,
        creator_id: Uuid,
        what: &str,
    ) -> Result<(), IdeationError> {
        let role = self.member(ctx, team_id).await?;
        if creator_id == ctx.user_id || role.can_manage() {
            Ok(())
        } else {
            Err(IdeationError::forbidden(format!(
                "only the creator or a team owner/admin can change this {}",
                what
            )))
        }
    }

    /// Completion on the caller's behalf; an empty reply is unusable
    async fn complete(
        &self,
        ctx: &SecurityCtx,
        feature: &str,
        provider: Option<ProviderKind>,
        request: ChatRequest,
    ) -> Result<ChatCompletion, IdeationError> {
        let completion = self.ai.chat(ctx.user_id, feature, provider, request).await?;
        if completion.content.trim().is_empty() {
            return Err(IdeationError::ai_response("the model returned an empty reply"));
        }
        Ok(completion)
    }

    /// Events never fail the operation that produced them
    async fn publish(&self, event: IdeationEvent) {
        let name = event.name();
        if let Err(e) = self.sink.publish(event).await {
            tracing::warn!(event = %name, error = %e, "failed to publish ideation event");
        }
    }
}
