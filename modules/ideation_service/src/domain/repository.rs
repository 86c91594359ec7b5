//! Repository traits for data access
//!
//! Implementations are in infra/storage/repositories.rs

use crate::contract::{BrainstormSession, Diagram};
use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn create(&self, session: &BrainstormSession) -> Result<BrainstormSession>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<BrainstormSession>>;

    /// Sessions of a team, newest first
    async fn list_by_team(&self, team_id: Uuid) -> Result<Vec<BrainstormSession>>;

    /// Replaces the whole row, ideas included
    async fn update(&self, session: &BrainstormSession) -> Result<BrainstormSession>;

    async fn delete(&self, id: Uuid) -> Result<()>;

    async fn delete_by_team(&self, team_id: Uuid) -> Result<u64>;
}

#[async_trait]
pub trait DiagramRepository: Send + Sync {
    async fn create(&self, diagram: &Diagram) -> Result<Diagram>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Diagram>>;

    /// Diagrams of a team, most recently updated first
    async fn list_by_team(&self, team_id: Uuid) -> Result<Vec<Diagram>>;

    async fn update(&self, diagram: &Diagram) -> Result<Diagram>;

    async fn delete(&self, id: Uuid) -> Result<()>;

    async fn delete_by_team(&self, team_id: Uuid) -> Result<u64>;
}
