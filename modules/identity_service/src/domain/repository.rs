//! Repository traits for data access
//!
//! Implementations are in infra/storage/repositories.rs

use crate::contract::{Invitation, InvitationStatus, MemberProfile, Team, TeamMember, TeamRole, User};
use anyhow::Result;
use async_trait::async_trait;
use brainforge_kit::Role;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// User row together with its password hash
#[derive(Debug, Clone)]
pub struct StoredUser {
    pub user: User,
    pub password_hash: String,
}

/// Repository for user accounts
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user
    async fn create(&self, user: &User, password_hash: &str) -> Result<User>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<StoredUser>>;

    /// Lookup by normalized email
    async fn find_by_email(&self, email: &str) -> Result<Option<StoredUser>>;

    /// Update profile fields (display name, avatar, role, updated_at)
    async fn update(&self, user: &User) -> Result<User>;

    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<()>;

    async fn touch_login(&self, id: Uuid, at: DateTime<Utc>) -> Result<()>;

    async fn set_role(&self, id: Uuid, role: Role) -> Result<()>;

    /// Users ordered by creation time
    async fn list(&self, limit: u64, offset: u64) -> Result<Vec<User>>;

    async fn count(&self) -> Result<u64>;
}

/// Repository for teams and memberships
#[async_trait]
pub trait TeamRepository: Send + Sync {
    /// Insert a team and its owner membership atomically
    async fn create_with_owner(&self, team: &Team, owner: &TeamMember) -> Result<Team>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Team>>;

    /// Teams the user belongs to, with the user's role
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<(Team, TeamRole)>>;

    async fn update(&self, team: &Team) -> Result<Team>;

    /// Delete a team; memberships and invitations cascade
    async fn delete(&self, id: Uuid) -> Result<()>;

    async fn add_member(&self, member: &TeamMember) -> Result<()>;

    async fn find_member(&self, team_id: Uuid, user_id: Uuid) -> Result<Option<TeamMember>>;

    /// Members joined with their user profiles, ordered by join time
    async fn list_members(&self, team_id: Uuid) -> Result<Vec<MemberProfile>>;

    async fn update_member_role(&self, team_id: Uuid, user_id: Uuid, role: TeamRole) -> Result<()>;

    async fn remove_member(&self, team_id: Uuid, user_id: Uuid) -> Result<()>;
}

/// Repository for team invitations
#[async_trait]
pub trait InvitationRepository: Send + Sync {
    async fn create(&self, invitation: &Invitation) -> Result<Invitation>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Invitation>>;

    async fn find_by_token(&self, token: &str) -> Result<Option<Invitation>>;

    /// Pending invitation of `email` into `team_id`, if any
    async fn find_pending(&self, team_id: Uuid, email: &str) -> Result<Option<Invitation>>;

    /// All invitations of a team, newest first
    async fn list_for_team(&self, team_id: Uuid) -> Result<Vec<Invitation>>;

    /// Pending invitations addressed to `email`, newest first
    async fn list_pending_for_email(&self, email: &str) -> Result<Vec<Invitation>>;

    async fn update_status(
        &self,
        id: Uuid,
        status: InvitationStatus,
        responded_at: Option<DateTime<Utc>>,
    ) -> Result<()>;
}
