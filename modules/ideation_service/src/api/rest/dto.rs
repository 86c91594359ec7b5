//! REST DTOs with serde derives for HTTP API
//!
//! Diagram kinds and AI providers travel as snake_case strings and are
//! parsed in the handlers.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

// ===== Brainstorm DTOs =====

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct IdeaDto {
    pub id: Uuid,
    pub text: String,
    /// `user` or `ai`
    #[schema(example = "user")]
    pub author_kind: String,
    pub author_id: Option<Uuid>,
    pub votes: usize,
    pub voters: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SessionDto {
    pub id: Uuid,
    pub team_id: Uuid,
    pub title: String,
    pub topic: String,
    pub created_by: Uuid,
    #[schema(example = "open")]
    pub status: String,
    pub ideas: Vec<IdeaDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_summary: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateSessionRequest {
    pub title: String,
    pub topic: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AddIdeaRequest {
    pub text: String,
}

fn default_idea_count() -> usize {
    5
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct GenerateIdeasRequest {
    #[serde(default = "default_idea_count")]
    pub count: usize,
    #[schema(example = "claude")]
    pub provider: Option<String>,
}

/// `?provider=` for AI routes without a body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderQuery {
    pub provider: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ConvertIdeasRequest {
    pub idea_ids: Vec<Uuid>,
}

/// Planner task created from an idea or picked for a sprint
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TaskDto {
    pub id: Uuid,
    pub team_id: Uuid,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: String,
    pub priority: String,
    pub assignee_id: Option<Uuid>,
    pub due_date: Option<NaiveDate>,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

// ===== Diagram DTOs =====

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DiagramDto {
    pub id: Uuid,
    pub team_id: Uuid,
    pub title: String,
    #[schema(example = "flowchart")]
    pub kind: String,
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateDiagramRequest {
    pub title: String,
    pub kind: String,
    pub source: String,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateDiagramRequest {
    pub title: Option<String>,
    pub kind: Option<String>,
    pub source: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct GenerateDiagramRequest {
    pub title: Option<String>,
    pub kind: String,
    pub prompt: String,
    pub provider: Option<String>,
}

// ===== Sprint planning DTOs =====

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SprintSuggestionRequest {
    pub goal: String,
    pub capacity: usize,
    pub provider: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SprintSuggestionDto {
    pub goal: String,
    pub capacity: usize,
    pub tasks: Vec<TaskDto>,
    pub rationale: String,
    pub provider: String,
    pub model: String,
}
