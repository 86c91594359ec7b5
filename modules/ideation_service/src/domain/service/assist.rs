//! AI assists: idea generation, summaries, diagrams and sprint suggestions

use super::{internal, Service};
use crate::contract::{
    BrainstormSession, Diagram, DiagramPrompt, Idea, IdeaAuthor, IdeationError, SprintRequest,
    SprintSuggestion,
};
use crate::domain::events::ChangeKind;
use crate::domain::mermaid::{check_header, extract_source};
use crate::domain::prompts;
use crate::domain::validation::{
    required_text, truncate_chars, validate_capacity, validate_idea_count, validate_title,
    MAX_PROMPT_LENGTH, MAX_TITLE_LENGTH,
};
use ai_gateway::ProviderKind;
use brainforge_kit::SecurityCtx;
use chrono::Utc;
use planner_service::{Task, TaskPriority};
use uuid::Uuid;

const FEATURE_IDEAS: &str = "brainstorm";
const FEATURE_SUMMARY: &str = "brainstorm_summary";
const FEATURE_DIAGRAM: &str = "diagram";
const FEATURE_SPRINT: &str = "sprint_planning";

const MAX_GOAL_LENGTH: usize = 500;

impl Service {
    /// Ask the model for `count` new ideas and append them as AI ideas.
    ///
    /// Lines repeating an existing idea are dropped, so fewer than `count`
    /// ideas may be added; a reply with none is an error.
    pub async fn generate_ideas(
        &self,
        ctx: &SecurityCtx,
        session_id: Uuid,
        count: usize,
        provider: Option<ProviderKind>,
    ) -> Result<BrainstormSession, IdeationError> {
        let count = validate_idea_count(count)?;
        let session = self.open_session(ctx, session_id).await?;
        self.check_room_for(&session, count)?;

        let request = prompts::idea_request(&session, count, self.config.idea_temperature, self.config.max_tokens);
        let completion = self.complete(ctx, FEATURE_IDEAS, provider, request).await?;

        // Re-read under the lock; others may have added ideas meanwhile
        let _guard = self.session_writes.lock().await;
        let mut session = self.open_session(ctx, session_id).await?;
        let texts = prompts::parse_ideas(&completion.content, &session, count);
        if texts.is_empty() {
            return Err(IdeationError::ai_response("the reply contained no new ideas"));
        }
        self.check_room_for(&session, texts.len())?;

        let now = Utc::now();
        let added = texts.len();
        session.ideas.extend(texts.into_iter().map(|text| Idea {
            id: Uuid::new_v4(),
            text,
            author: IdeaAuthor::Ai,
            voters: Vec::new(),
            created_at: now,
        }));
        session.updated_at = now;

        let session = self.sessions.update(&session).await.map_err(internal)?;
        tracing::info!(
            session_id = %session.id,
            requested = count,
            added,
            provider = %completion.provider,
            "generated brainstorm ideas"
        );
        self.publish_session(ctx, &session, ChangeKind::IdeaAdded).await;
        Ok(session)
    }

    /// Store an AI summary of the session's ideas; closed sessions may be summarized
    pub async fn summarize(
        &self,
        ctx: &SecurityCtx,
        session_id: Uuid,
        provider: Option<ProviderKind>,
    ) -> Result<BrainstormSession, IdeationError> {
        let session = self.get_session(ctx, session_id).await?;
        if session.ideas.is_empty() {
            return Err(IdeationError::validation("there are no ideas to summarize yet"));
        }

        let request = prompts::summary_request(&session, self.config.max_tokens);
        let completion = self.complete(ctx, FEATURE_SUMMARY, provider, request).await?;

        let _guard = self.session_writes.lock().await;
        let mut session = self.find_session(session_id).await?;
        session.ai_summary = Some(completion.content.trim().to_string());
        session.updated_at = Utc::now();

        let session = self.sessions.update(&session).await.map_err(internal)?;
        tracing::info!(session_id = %session.id, provider = %completion.provider, "brainstorm session summarized");
        self.publish_session(ctx, &session, ChangeKind::Updated).await;
        Ok(session)
    }

    /// Generate Mermaid for `prompt` and store it as a new diagram
    pub async fn generate_diagram(
        &self,
        ctx: &SecurityCtx,
        team_id: Uuid,
        input: DiagramPrompt,
    ) -> Result<Diagram, IdeationError> {
        self.member(ctx, team_id).await?;
        let prompt = required_text(&input.prompt, "prompt", MAX_PROMPT_LENGTH)?;
        let title = match input.title {
            Some(title) => validate_title(&title)?,
            None => default_title(&prompt),
        };

        let request = prompts::diagram_request(input.kind, &prompt, self.config.max_tokens);
        let completion = self.complete(ctx, FEATURE_DIAGRAM, input.provider, request).await?;

        let source = extract_source(&completion.content);
        check_header(input.kind, &source).map_err(IdeationError::ai_response)?;
        if source.chars().count() > self.config.max_source_length {
            return Err(IdeationError::ai_response("the generated diagram is too large"));
        }

        self.store_diagram(ctx, team_id, title, input.kind, source, Some(prompt))
            .await
    }

    /// Let the model pick backlog tasks for a sprint goal.
    ///
    /// Only ids of real backlog tasks are kept, at most `capacity` of them.
    pub async fn suggest_sprint_plan(
        &self,
        ctx: &SecurityCtx,
        team_id: Uuid,
        input: SprintRequest,
    ) -> Result<SprintSuggestion, IdeationError> {
        let goal = required_text(&input.goal, "goal", MAX_GOAL_LENGTH)?;
        let capacity = validate_capacity(input.capacity)?;

        let mut backlog = self.planner.backlog(ctx, team_id).await?;
        if backlog.is_empty() {
            return Err(IdeationError::validation("the backlog is empty"));
        }
        backlog.sort_by_key(|t| (priority_rank(t.priority), t.due_date.is_none(), t.due_date, t.position));
        backlog.truncate(self.config.max_backlog_in_prompt);

        let request = prompts::sprint_request(&goal, capacity, &backlog, self.config.max_tokens);
        let completion = self.complete(ctx, FEATURE_SPRINT, input.provider, request).await?;

        let picked = prompts::parse_task_ids(&completion.content, &backlog, capacity);
        let tasks: Vec<Task> = picked
            .iter()
            .filter_map(|id| backlog.iter().find(|t| t.id == *id).cloned())
            .collect();

        tracing::info!(
            team_id = %team_id,
            backlog = backlog.len(),
            picked = tasks.len(),
            capacity,
            "sprint suggestion generated"
        );
        Ok(SprintSuggestion {
            goal,
            capacity,
            tasks,
            rationale: completion.content.trim().to_string(),
            provider: completion.provider,
            model: completion.model,
        })
    }
}

fn priority_rank(priority: TaskPriority) -> u8 {
    match priority {
        TaskPriority::Urgent => 0,
        TaskPriority::High => 1,
        TaskPriority::Medium => 2,
        TaskPriority::Low => 3,
    }
}

/// First line of the prompt, cut to a title
fn default_title(prompt: &str) -> String {
    let first = prompt.lines().next().unwrap_or(prompt).trim();
    truncate_chars(first, MAX_TITLE_LENGTH)
}
