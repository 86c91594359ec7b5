//! Native client trait for inter-module communication

use super::error::IdeationError;
use async_trait::async_trait;
use uuid::Uuid;

#[async_trait]
pub trait IdeationApi: Send + Sync {
    /// Delete every session and diagram of a team
    async fn purge_team(&self, team_id: Uuid) -> Result<(), IdeationError>;

    /// Team owning a brainstorm session
    async fn session_team(&self, session_id: Uuid) -> Result<Uuid, IdeationError>;
}
