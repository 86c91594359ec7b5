//! Ideation Service Module
//!
//! Team brainstorming sessions with voting, Mermaid diagrams and the AI
//! assists built on top of them: idea generation, session summaries,
//! diagram generation and sprint suggestions.

// Public exports
pub mod contract;
pub use contract::{
    client::IdeationApi,
    error::IdeationError,
    BrainstormSession, Diagram, DiagramKind, Idea, IdeaAuthor, SessionStatus, SprintSuggestion,
};

pub mod module;
pub use module::IdeationModule;

// Internal modules (hidden from public API)
#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod config;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;
