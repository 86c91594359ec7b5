//! Entity to model mappers
//!
//! Ideas are stored as a JSON array; an idea's author is either
//! `{"kind":"user","user_id":...}` or `{"kind":"ai"}`.

use super::entity::{brainstorm_session, diagram};
use crate::contract::{BrainstormSession, Diagram, DiagramKind, Idea, IdeaAuthor, SessionStatus};
use anyhow::{anyhow, Context};
use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum StoredAuthor {
    User { user_id: Uuid },
    Ai,
}

#[derive(Serialize, Deserialize)]
struct StoredIdea {
    id: Uuid,
    text: String,
    author: StoredAuthor,
    #[serde(default)]
    voters: Vec<Uuid>,
    created_at: DateTime<Utc>,
}

impl From<&Idea> for StoredIdea {
    fn from(idea: &Idea) -> Self {
        Self {
            id: idea.id,
            text: idea.text.clone(),
            author: match idea.author {
                IdeaAuthor::User(user_id) => StoredAuthor::User { user_id },
                IdeaAuthor::Ai => StoredAuthor::Ai,
            },
            voters: idea.voters.clone(),
            created_at: idea.created_at,
        }
    }
}

impl From<StoredIdea> for Idea {
    fn from(stored: StoredIdea) -> Self {
        Self {
            id: stored.id,
            text: stored.text,
            author: match stored.author {
                StoredAuthor::User { user_id } => IdeaAuthor::User(user_id),
                StoredAuthor::Ai => IdeaAuthor::Ai,
            },
            voters: stored.voters,
            created_at: stored.created_at,
        }
    }
}

pub fn ideas_to_json(ideas: &[Idea]) -> anyhow::Result<serde_json::Value> {
    let stored: Vec<StoredIdea> = ideas.iter().map(StoredIdea::from).collect();
    serde_json::to_value(stored).context("failed to encode ideas")
}

pub fn ideas_from_json(value: serde_json::Value) -> anyhow::Result<Vec<Idea>> {
    let stored: Vec<StoredIdea> =
        serde_json::from_value(value).context("ideas column is not a valid idea list")?;
    Ok(stored.into_iter().map(Idea::from).collect())
}

// ===== Session conversions =====

impl TryFrom<brainstorm_session::Model> for BrainstormSession {
    type Error = anyhow::Error;

    fn try_from(entity: brainstorm_session::Model) -> Result<Self, Self::Error> {
        let status = SessionStatus::parse(&entity.status)
            .ok_or_else(|| anyhow!("unknown session status '{}' for session {}", entity.status, entity.id))?;

        Ok(Self {
            id: entity.id,
            team_id: entity.team_id,
            title: entity.title,
            topic: entity.topic,
            created_by: entity.created_by,
            status,
            ideas: ideas_from_json(entity.ideas)?,
            ai_summary: entity.ai_summary,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
            closed_at: entity.closed_at,
        })
    }
}

impl TryFrom<&BrainstormSession> for brainstorm_session::ActiveModel {
    type Error = anyhow::Error;

    fn try_from(model: &BrainstormSession) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Set(model.id),
            team_id: Set(model.team_id),
            title: Set(model.title.clone()),
            topic: Set(model.topic.clone()),
            created_by: Set(model.created_by),
            status: Set(model.status.as_str().to_string()),
            ideas: Set(ideas_to_json(&model.ideas)?),
            ai_summary: Set(model.ai_summary.clone()),
            created_at: Set(model.created_at),
            updated_at: Set(model.updated_at),
            closed_at: Set(model.closed_at),
        })
    }
}

// ===== Diagram conversions =====

impl TryFrom<diagram::Model> for Diagram {
    type Error = anyhow::Error;

    fn try_from(entity: diagram::Model) -> Result<Self, Self::Error> {
        let kind = DiagramKind::parse(&entity.kind)
            .ok_or_else(|| anyhow!("unknown diagram kind '{}' for diagram {}", entity.kind, entity.id))?;

        Ok(Self {
            id: entity.id,
            team_id: entity.team_id,
            title: entity.title,
            kind,
            source: entity.source,
            prompt: entity.prompt,
            created_by: entity.created_by,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        })
    }
}

impl From<&Diagram> for diagram::ActiveModel {
    fn from(model: &Diagram) -> Self {
        Self {
            id: Set(model.id),
            team_id: Set(model.team_id),
            title: Set(model.title.clone()),
            kind: Set(model.kind.as_str().to_string()),
            source: Set(model.source.clone()),
            prompt: Set(model.prompt.clone()),
            created_by: Set(model.created_by),
            created_at: Set(model.created_at),
            updated_at: Set(model.updated_at),
        }
    }
}
