//! Contract model to DTO conversions

use super::dto::*;
use crate::contract::{BrainstormSession, Diagram, DiagramKind, Idea, IdeaAuthor, SprintSuggestion};
use ai_gateway::ProviderKind;
use brainforge_kit::Problem;
use planner_service::Task;

impl From<Idea> for IdeaDto {
    fn from(idea: Idea) -> Self {
        let (author_kind, author_id) = match idea.author {
            IdeaAuthor::User(user_id) => ("user", Some(user_id)),
            IdeaAuthor::Ai => ("ai", None),
        };
        Self {
            id: idea.id,
            votes: idea.voters.len(),
            text: idea.text,
            author_kind: author_kind.to_string(),
            author_id,
            voters: idea.voters,
            created_at: idea.created_at,
        }
    }
}

impl From<BrainstormSession> for SessionDto {
    fn from(session: BrainstormSession) -> Self {
        Self {
            id: session.id,
            team_id: session.team_id,
            title: session.title,
            topic: session.topic,
            created_by: session.created_by,
            status: session.status.as_str().to_string(),
            ideas: session.ideas.into_iter().map(IdeaDto::from).collect(),
            ai_summary: session.ai_summary,
            created_at: session.created_at,
            updated_at: session.updated_at,
            closed_at: session.closed_at,
        }
    }
}

impl From<Diagram> for DiagramDto {
    fn from(diagram: Diagram) -> Self {
        Self {
            id: diagram.id,
            team_id: diagram.team_id,
            title: diagram.title,
            kind: diagram.kind.as_str().to_string(),
            source: diagram.source,
            prompt: diagram.prompt,
            created_by: diagram.created_by,
            created_at: diagram.created_at,
            updated_at: diagram.updated_at,
        }
    }
}

impl From<Task> for TaskDto {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            team_id: task.team_id,
            title: task.title,
            description: task.description,
            status: task.status.as_str().to_string(),
            priority: task.priority.as_str().to_string(),
            assignee_id: task.assignee_id,
            due_date: task.due_date,
            tags: task.tags,
            created_at: task.created_at,
        }
    }
}

impl From<SprintSuggestion> for SprintSuggestionDto {
    fn from(suggestion: SprintSuggestion) -> Self {
        Self {
            goal: suggestion.goal,
            capacity: suggestion.capacity,
            tasks: suggestion.tasks.into_iter().map(TaskDto::from).collect(),
            rationale: suggestion.rationale,
            provider: suggestion.provider.as_str().to_string(),
            model: suggestion.model,
        }
    }
}

pub fn parse_kind(kind: &str) -> Result<DiagramKind, Problem> {
    DiagramKind::parse(kind).ok_or_else(|| Problem::bad_request(format!("unknown diagram kind '{}'", kind)))
}

pub fn parse_provider(provider: Option<&str>) -> Result<Option<ProviderKind>, Problem> {
    provider
        .map(|p| ProviderKind::parse(p).ok_or_else(|| Problem::bad_request(format!("unknown AI provider '{}'", p))))
        .transpose()
}
