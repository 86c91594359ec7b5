//! Native client trait for inter-module communication
//!
//! Planner, ideation and realtime modules use this to resolve users and
//! enforce team membership. NO HTTP - direct function calls.

use super::{error::IdentityError, model::{TeamRole, User}};
use async_trait::async_trait;
use uuid::Uuid;

#[async_trait]
pub trait IdentityApi: Send + Sync {
    /// Get a user by id
    async fn get_user(&self, user_id: Uuid) -> Result<User, IdentityError>;

    /// Role of `user_id` in `team_id`, `None` when not a member
    async fn team_role(&self, team_id: Uuid, user_id: Uuid) -> Result<Option<TeamRole>, IdentityError>;

    /// Role of a member; `NotFound` for unknown teams, `Forbidden` for non-members
    async fn require_member(&self, team_id: Uuid, user_id: Uuid) -> Result<TeamRole, IdentityError>;

    /// All member ids of a team
    async fn team_member_ids(&self, team_id: Uuid) -> Result<Vec<Uuid>, IdentityError>;
}
