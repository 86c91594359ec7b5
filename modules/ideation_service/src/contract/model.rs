//! Contract models for the ideation service
//!
//! NO serde derives - these are pure domain models.

use ai_gateway::ProviderKind;
use chrono::{DateTime, Utc};
use planner_service::Task;
use uuid::Uuid;

// ===== Brainstorming =====

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Open,
    /// Read-only from here on
    Closed,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Open => "open",
            SessionStatus::Closed => "closed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "open" => Some(SessionStatus::Open),
            "closed" => Some(SessionStatus::Closed),
            _ => None,
        }
    }
}

/// Who contributed an idea
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdeaAuthor {
    User(Uuid),
    Ai,
}

impl IdeaAuthor {
    pub fn user_id(&self) -> Option<Uuid> {
        match self {
            IdeaAuthor::User(id) => Some(*id),
            IdeaAuthor::Ai => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Idea {
    pub id: Uuid,
    pub text: String,
    pub author: IdeaAuthor,
    /// Users who voted for the idea, at most once each
    pub voters: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Idea {
    pub fn votes(&self) -> usize {
        self.voters.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrainstormSession {
    pub id: Uuid,
    pub team_id: Uuid,
    pub title: String,
    pub topic: String,
    pub created_by: Uuid,
    pub status: SessionStatus,
    /// In insertion order
    pub ideas: Vec<Idea>,
    pub ai_summary: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
}

impl BrainstormSession {
    pub fn idea(&self, idea_id: Uuid) -> Option<&Idea> {
        self.ideas.iter().find(|i| i.id == idea_id)
    }

    pub fn is_open(&self) -> bool {
        self.status == SessionStatus::Open
    }
}

#[derive(Debug, Clone, Default)]
pub struct NewSession {
    pub title: String,
    pub topic: String,
}

// ===== Diagrams =====

/// Mermaid diagram type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagramKind {
    Flowchart,
    Sequence,
    Mindmap,
    Gantt,
    ErDiagram,
}

impl DiagramKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagramKind::Flowchart => "flowchart",
            DiagramKind::Sequence => "sequence",
            DiagramKind::Mindmap => "mindmap",
            DiagramKind::Gantt => "gantt",
            DiagramKind::ErDiagram => "er_diagram",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "flowchart" => Some(DiagramKind::Flowchart),
            "sequence" => Some(DiagramKind::Sequence),
            "mindmap" => Some(DiagramKind::Mindmap),
            "gantt" => Some(DiagramKind::Gantt),
            "er_diagram" => Some(DiagramKind::ErDiagram),
            _ => None,
        }
    }

    /// Mermaid keywords a source of this kind may start with
    pub fn header_keywords(&self) -> &'static [&'static str] {
        match self {
            DiagramKind::Flowchart => &["flowchart", "graph"],
            DiagramKind::Sequence => &["sequenceDiagram"],
            DiagramKind::Mindmap => &["mindmap"],
            DiagramKind::Gantt => &["gantt"],
            DiagramKind::ErDiagram => &["erDiagram"],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagram {
    pub id: Uuid,
    pub team_id: Uuid,
    pub title: String,
    pub kind: DiagramKind,
    /// Mermaid source
    pub source: String,
    /// Prompt the diagram was generated from
    pub prompt: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewDiagram {
    pub title: String,
    pub kind: DiagramKind,
    pub source: String,
}

#[derive(Debug, Clone, Default)]
pub struct DiagramPatch {
    pub title: Option<String>,
    /// The source is re-checked against the (new) kind
    pub kind: Option<DiagramKind>,
    pub source: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DiagramPrompt {
    /// Defaults to the first line of the prompt
    pub title: Option<String>,
    pub kind: DiagramKind,
    pub prompt: String,
    pub provider: Option<ProviderKind>,
}

// ===== Sprint planning =====

#[derive(Debug, Clone)]
pub struct SprintRequest {
    pub goal: String,
    /// Maximum number of tasks to pick
    pub capacity: usize,
    pub provider: Option<ProviderKind>,
}

/// Backlog tasks the model picked for the next sprint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SprintSuggestion {
    pub goal: String,
    pub capacity: usize,
    /// In the order the model ranked them
    pub tasks: Vec<Task>,
    /// The model's reply, for display
    pub rationale: String,
    pub provider: ProviderKind,
    pub model: String,
}
