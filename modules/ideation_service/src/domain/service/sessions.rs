use super::{internal, Service};
use crate::contract::{BrainstormSession, Idea, IdeaAuthor, IdeationError, NewSession, SessionStatus};
use crate::domain::events::{ChangeKind, IdeationEvent};
use crate::domain::validation::{
    required_text, truncate_chars, validate_title, MAX_IDEA_LENGTH, MAX_TITLE_LENGTH, MAX_TOPIC_LENGTH,
};
use brainforge_kit::SecurityCtx;
use chrono::Utc;
use planner_service::{NewTask, Task};
use uuid::Uuid;

/// Ideas converted in one request
const MAX_CONVERT: usize = 50;

impl Service {
    pub async fn create_session(
        &self,
        ctx: &SecurityCtx,
        team_id: Uuid,
        new_session: NewSession,
    ) -> Result<BrainstormSession, IdeationError> {
        self.member(ctx, team_id).await?;

        let now = Utc::now();
        let session = BrainstormSession {
            id: Uuid::new_v4(),
            team_id,
            title: validate_title(&new_session.title)?,
            topic: required_text(&new_session.topic, "topic", MAX_TOPIC_LENGTH)?,
            created_by: ctx.user_id,
            status: SessionStatus::Open,
            ideas: Vec::new(),
            ai_summary: None,
            created_at: now,
            updated_at: now,
            closed_at: None,
        };

        let session = self.sessions.create(&session).await.map_err(internal)?;
        tracing::info!(session_id = %session.id, team_id = %team_id, "brainstorm session created");
        self.publish_session(ctx, &session, ChangeKind::Created).await;
        Ok(session)
    }

    /// Newest first
    pub async fn list_sessions(&self, ctx: &SecurityCtx, team_id: Uuid) -> Result<Vec<BrainstormSession>, IdeationError> {
        self.member(ctx, team_id).await?;
        self.sessions.list_by_team(team_id).await.map_err(internal)
    }

    pub async fn get_session(&self, ctx: &SecurityCtx, session_id: Uuid) -> Result<BrainstormSession, IdeationError> {
        let session = self.find_session(session_id).await?;
        self.member(ctx, session.team_id).await?;
        Ok(session)
    }

    /// Creator or team owner/admin only
    pub async fn delete_session(&self, ctx: &SecurityCtx, session_id: Uuid) -> Result<(), IdeationError> {
        let session = self.find_session(session_id).await?;
        self.require_creator_or_manager(ctx, session.team_id, session.created_by, "session")
            .await?;

        self.sessions.delete(session.id).await.map_err(internal)?;
        tracing::info!(session_id = %session.id, "brainstorm session deleted");
        self.publish_session(ctx, &session, ChangeKind::Deleted).await;
        Ok(())
    }

    pub async fn add_idea(
        &self,
        ctx: &SecurityCtx,
        session_id: Uuid,
        text: &str,
    ) -> Result<BrainstormSession, IdeationError> {
        let text = required_text(text, "idea", MAX_IDEA_LENGTH)?;

        let _guard = self.session_writes.lock().await;
        let mut session = self.open_session(ctx, session_id).await?;
        self.check_room_for(&session, 1)?;

        let now = Utc::now();
        session.ideas.push(Idea {
            id: Uuid::new_v4(),
            text,
            author: IdeaAuthor::User(ctx.user_id),
            voters: Vec::new(),
            created_at: now,
        });
        session.updated_at = now;

        let session = self.sessions.update(&session).await.map_err(internal)?;
        self.publish_session(ctx, &session, ChangeKind::IdeaAdded).await;
        Ok(session)
    }

    /// One vote per user per idea; a second vote is a conflict
    pub async fn vote_idea(
        &self,
        ctx: &SecurityCtx,
        session_id: Uuid,
        idea_id: Uuid,
    ) -> Result<BrainstormSession, IdeationError> {
        let _guard = self.session_writes.lock().await;
        let mut session = self.open_session(ctx, session_id).await?;

        let idea = session
            .ideas
            .iter_mut()
            .find(|i| i.id == idea_id)
            .ok_or_else(|| IdeationError::not_found("idea", idea_id))?;
        if idea.voters.contains(&ctx.user_id) {
            return Err(IdeationError::conflict("you already voted for this idea"));
        }
        idea.voters.push(ctx.user_id);
        session.updated_at = Utc::now();

        let session = self.sessions.update(&session).await.map_err(internal)?;
        self.publish_session(ctx, &session, ChangeKind::Voted).await;
        Ok(session)
    }

    /// The idea's author, the session creator or a team owner/admin
    pub async fn remove_idea(
        &self,
        ctx: &SecurityCtx,
        session_id: Uuid,
        idea_id: Uuid,
    ) -> Result<BrainstormSession, IdeationError> {
        let _guard = self.session_writes.lock().await;
        let mut session = self.open_session(ctx, session_id).await?;

        let idea = session
            .idea(idea_id)
            .ok_or_else(|| IdeationError::not_found("idea", idea_id))?;
        if idea.author.user_id() != Some(ctx.user_id) {
            self.require_creator_or_manager(ctx, session.team_id, session.created_by, "idea")
                .await?;
        }

        session.ideas.retain(|i| i.id != idea_id);
        session.updated_at = Utc::now();

        let session = self.sessions.update(&session).await.map_err(internal)?;
        self.publish_session(ctx, &session, ChangeKind::IdeaRemoved).await;
        Ok(session)
    }

    /// Creator or team owner/admin only; closed sessions no longer change
    pub async fn close_session(&self, ctx: &SecurityCtx, session_id: Uuid) -> Result<BrainstormSession, IdeationError> {
        let _guard = self.session_writes.lock().await;
        let mut session = self.find_session(session_id).await?;
        self.require_creator_or_manager(ctx, session.team_id, session.created_by, "session")
            .await?;
        if !session.is_open() {
            return Err(IdeationError::conflict("session is already closed"));
        }

        let now = Utc::now();
        session.status = SessionStatus::Closed;
        session.closed_at = Some(now);
        session.updated_at = now;

        let session = self.sessions.update(&session).await.map_err(internal)?;
        tracing::info!(session_id = %session.id, ideas = session.ideas.len(), "brainstorm session closed");
        self.publish_session(ctx, &session, ChangeKind::Closed).await;
        Ok(session)
    }

    /// Create one planner task per chosen idea, in the order given.
    ///
    /// Works on open and closed sessions. Every id must belong to the
    /// session; tasks created before a planner failure are kept.
    pub async fn convert_to_tasks(
        &self,
        ctx: &SecurityCtx,
        session_id: Uuid,
        idea_ids: Vec<Uuid>,
    ) -> Result<Vec<Task>, IdeationError> {
        let session = self.get_session(ctx, session_id).await?;

        let mut unique: Vec<Uuid> = Vec::with_capacity(idea_ids.len());
        for id in idea_ids {
            if !unique.contains(&id) {
                unique.push(id);
            }
        }
        if unique.is_empty() {
            return Err(IdeationError::validation("select at least one idea"));
        }
        if unique.len() > MAX_CONVERT {
            return Err(IdeationError::validation(format!(
                "at most {} ideas can be converted at once",
                MAX_CONVERT
            )));
        }
        let ideas = unique
            .iter()
            .map(|id| session.idea(*id).ok_or_else(|| IdeationError::not_found("idea", id)))
            .collect::<Result<Vec<_>, _>>()?;

        let mut tasks = Vec::with_capacity(ideas.len());
        for idea in ideas {
            let task = self
                .planner
                .create_task(
                    ctx,
                    session.team_id,
                    NewTask {
                        title: truncate_chars(&idea.text, MAX_TITLE_LENGTH),
                        description: Some(format!(
                            "{}\n\nFrom brainstorm \"{}\"",
                            idea.text, session.title
                        )),
                        tags: vec!["brainstorm".to_string()],
                        ..Default::default()
                    },
                )
                .await?;
            tasks.push(task);
        }

        tracing::info!(
            session_id = %session.id,
            team_id = %session.team_id,
            tasks = tasks.len(),
            "converted brainstorm ideas to tasks"
        );
        Ok(tasks)
    }

    // ===== Helpers =====

    pub(super) async fn find_session(&self, session_id: Uuid) -> Result<BrainstormSession, IdeationError> {
        self.sessions
            .find_by_id(session_id)
            .await
            .map_err(internal)?
            .ok_or_else(|| IdeationError::not_found("brainstorm session", session_id))
    }

    /// Session the caller may add to; closed sessions are a conflict
    pub(super) async fn open_session(
        &self,
        ctx: &SecurityCtx,
        session_id: Uuid,
    ) -> Result<BrainstormSession, IdeationError> {
        let session = self.get_session(ctx, session_id).await?;
        if !session.is_open() {
            return Err(IdeationError::conflict("session is closed"));
        }
        Ok(session)
    }

    pub(super) fn check_room_for(&self, session: &BrainstormSession, more: usize) -> Result<(), IdeationError> {
        if session.ideas.len() + more > self.config.max_ideas_per_session {
            return Err(IdeationError::validation(format!(
                "a session holds at most {} ideas",
                self.config.max_ideas_per_session
            )));
        }
        Ok(())
    }

    pub(super) async fn publish_session(&self, ctx: &SecurityCtx, session: &BrainstormSession, change: ChangeKind) {
        self.publish(IdeationEvent::Session {
            team_id: session.team_id,
            session_id: session.id,
            change,
            actor_id: ctx.user_id,
            timestamp: Utc::now(),
        })
        .await;
    }
}
