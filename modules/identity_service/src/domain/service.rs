//! Domain service - business logic orchestration

use super::events::{IdentityEvent, IdentityEventPublisher};
use super::password::{hash_password, verify_password};
use super::repository::{InvitationRepository, TeamRepository, UserRepository};
use super::validation;
use crate::config::Config;
use crate::contract::{
    AuthSession, IdentityError, Invitation, InvitationStatus, MemberProfile, NewTeam,
    ProfilePatch, Team, TeamMember, TeamMembership, TeamPatch, TeamRole, User,
};
use brainforge_kit::{Page, PageQuery, Role, SecurityCtx, TokenService};
use chrono::Utc;
use rand::Rng;
use std::sync::Arc;
use uuid::Uuid;

const BAD_CREDENTIALS: &str = "invalid email or password";

/// Log a repository failure and hide it behind `Internal`
fn internal(error: anyhow::Error) -> IdentityError {
    tracing::error!(error = ?error, "identity storage failure");
    IdentityError::Internal
}

/// Domain service for identity management
pub struct Service {
    users: Arc<dyn UserRepository>,
    teams: Arc<dyn TeamRepository>,
    invitations: Arc<dyn InvitationRepository>,
    tokens: Arc<TokenService>,
    events: Arc<dyn IdentityEventPublisher>,
    config: Config,
}

impl Service {
    /// Create a new service instance
    pub fn new(
        users: Arc<dyn UserRepository>,
        teams: Arc<dyn TeamRepository>,
        invitations: Arc<dyn InvitationRepository>,
        tokens: Arc<TokenService>,
        events: Arc<dyn IdentityEventPublisher>,
        config: Config,
    ) -> Self {
        Self {
            users,
            teams,
            invitations,
            tokens,
            events,
            config,
        }
    }

    // ===== Authentication =====

    /// Create an account and return a session for it
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<AuthSession, IdentityError> {
        let email = validation::normalize_email(email)?;
        validation::validate_password(password, self.config.min_password_length)?;
        let display_name = validation::validate_display_name(display_name)?;

        if self.users.find_by_email(&email).await.map_err(internal)?.is_some() {
            return Err(IdentityError::conflict(format!(
                "an account with email '{}' already exists",
                email
            )));
        }

        let role = if self.config.first_user_is_admin && self.users.count().await.map_err(internal)? == 0 {
            Role::Admin
        } else {
            Role::Member
        };

        let password_hash = hash_password(password)?;
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email,
            display_name,
            role,
            avatar_url: None,
            created_at: now,
            updated_at: now,
            last_login_at: Some(now),
        };

        let user = self.users.create(&user, &password_hash).await.map_err(internal)?;
        tracing::info!(user_id = %user.id, role = user.role.as_str(), "user registered");

        self.issue_session(user)
    }

    /// Authenticate with email and password
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSession, IdentityError> {
        let unauthorized = || IdentityError::Unauthorized {
            reason: BAD_CREDENTIALS.to_string(),
        };

        let email = validation::normalize_email(email).map_err(|_| unauthorized())?;
        let stored = self
            .users
            .find_by_email(&email)
            .await
            .map_err(internal)?
            .ok_or_else(unauthorized)?;

        if !verify_password(password, &stored.password_hash) {
            tracing::info!(user_id = %stored.user.id, "login rejected: wrong password");
            return Err(unauthorized());
        }

        let now = Utc::now();
        self.users
            .touch_login(stored.user.id, now)
            .await
            .map_err(internal)?;

        let mut user = stored.user;
        user.last_login_at = Some(now);
        tracing::info!(user_id = %user.id, "user logged in");

        self.issue_session(user)
    }

    fn issue_session(&self, user: User) -> Result<AuthSession, IdentityError> {
        let issued = self
            .tokens
            .issue(user.id, &user.email, user.role)
            .map_err(|e| {
                tracing::error!(error = %e, "failed to issue access token");
                IdentityError::Internal
            })?;

        Ok(AuthSession {
            user,
            token: issued.token,
            expires_at: issued.expires_at,
        })
    }

    // ===== Users =====

    pub async fn get_user(&self, user_id: Uuid) -> Result<User, IdentityError> {
        self.users
            .find_by_id(user_id)
            .await
            .map_err(internal)?
            .map(|stored| stored.user)
            .ok_or_else(|| IdentityError::not_found("user", user_id))
    }

    pub async fn update_profile(
        &self,
        ctx: &SecurityCtx,
        patch: ProfilePatch,
    ) -> Result<User, IdentityError> {
        let mut user = self.get_user(ctx.user_id).await?;

        if let Some(name) = patch.display_name {
            user.display_name = validation::validate_display_name(&name)?;
        }
        if let Some(avatar) = patch.avatar_url {
            user.avatar_url = if avatar.trim().is_empty() {
                None
            } else {
                Some(validation::validate_avatar_url(&avatar)?)
            };
        }
        user.updated_at = Utc::now();

        self.users.update(&user).await.map_err(internal)
    }

    pub async fn change_password(
        &self,
        ctx: &SecurityCtx,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), IdentityError> {
        let stored = self
            .users
            .find_by_id(ctx.user_id)
            .await
            .map_err(internal)?
            .ok_or_else(|| IdentityError::not_found("user", ctx.user_id))?;

        if !verify_password(current_password, &stored.password_hash) {
            return Err(IdentityError::Unauthorized {
                reason: "current password is incorrect".to_string(),
            });
        }
        validation::validate_password(new_password, self.config.min_password_length)?;

        let hash = hash_password(new_password)?;
        self.users
            .update_password(ctx.user_id, &hash)
            .await
            .map_err(internal)?;

        tracing::info!(user_id = %ctx.user_id, "password changed");
        Ok(())
    }

    /// Admin-only user listing
    pub async fn list_users(
        &self,
        ctx: &SecurityCtx,
        page: PageQuery,
    ) -> Result<Page<User>, IdentityError> {
        require_platform_admin(ctx)?;

        let total = self.users.count().await.map_err(internal)?;
        let items = self
            .users
            .list(page.limit(), page.offset())
            .await
            .map_err(internal)?;

        Ok(Page::new(items, total, page))
    }

    /// Admin-only platform role change
    pub async fn set_user_role(
        &self,
        ctx: &SecurityCtx,
        user_id: Uuid,
        role: Role,
    ) -> Result<User, IdentityError> {
        require_platform_admin(ctx)?;

        if user_id == ctx.user_id && role != Role::Admin {
            return Err(IdentityError::validation("administrators cannot demote themselves"));
        }

        let mut user = self.get_user(user_id).await?;
        self.users.set_role(user_id, role).await.map_err(internal)?;
        user.role = role;

        tracing::info!(user_id = %user_id, role = role.as_str(), changed_by = %ctx.user_id, "user role changed");
        Ok(user)
    }

    // ===== Teams =====

    pub async fn create_team(
        &self,
        ctx: &SecurityCtx,
        new_team: NewTeam,
    ) -> Result<TeamMembership, IdentityError> {
        let name = validation::validate_team_name(&new_team.name)?;
        let description = validation::normalize_description(new_team.description)?;

        let now = Utc::now();
        let team = Team {
            id: Uuid::new_v4(),
            name,
            description,
            owner_id: ctx.user_id,
            created_at: now,
            updated_at: now,
        };
        let owner = TeamMember {
            team_id: team.id,
            user_id: ctx.user_id,
            role: TeamRole::Owner,
            joined_at: now,
        };

        let team = self
            .teams
            .create_with_owner(&team, &owner)
            .await
            .map_err(internal)?;

        tracing::info!(team_id = %team.id, owner_id = %ctx.user_id, "team created");
        self.publish(IdentityEvent::MemberJoined {
            team_id: team.id,
            user_id: ctx.user_id,
            role: TeamRole::Owner.as_str().to_string(),
            timestamp: now,
        })
        .await;

        Ok(TeamMembership {
            team,
            role: TeamRole::Owner,
        })
    }

    pub async fn list_my_teams(&self, ctx: &SecurityCtx) -> Result<Vec<TeamMembership>, IdentityError> {
        let teams = self
            .teams
            .list_for_user(ctx.user_id)
            .await
            .map_err(internal)?;

        Ok(teams
            .into_iter()
            .map(|(team, role)| TeamMembership { team, role })
            .collect())
    }

    pub async fn get_team(&self, ctx: &SecurityCtx, team_id: Uuid) -> Result<TeamMembership, IdentityError> {
        let team = self.find_team(team_id).await?;
        let role = self.require_member(team_id, ctx.user_id).await?;
        Ok(TeamMembership { team, role })
    }

    pub async fn update_team(
        &self,
        ctx: &SecurityCtx,
        team_id: Uuid,
        patch: TeamPatch,
    ) -> Result<Team, IdentityError> {
        let mut team = self.find_team(team_id).await?;
        self.require_manager(team_id, ctx.user_id).await?;

        if let Some(name) = patch.name {
            team.name = validation::validate_team_name(&name)?;
        }
        if patch.description.is_some() {
            team.description = validation::normalize_description(patch.description)?;
        }
        team.updated_at = Utc::now();

        self.teams.update(&team).await.map_err(internal)
    }

    /// Owner-only team deletion
    pub async fn delete_team(&self, ctx: &SecurityCtx, team_id: Uuid) -> Result<(), IdentityError> {
        self.find_team(team_id).await?;
        let role = self.require_member(team_id, ctx.user_id).await?;
        if role != TeamRole::Owner {
            return Err(IdentityError::forbidden("only the team owner can delete the team"));
        }

        self.teams.delete(team_id).await.map_err(internal)?;
        tracing::info!(team_id = %team_id, deleted_by = %ctx.user_id, "team deleted");

        self.publish(IdentityEvent::TeamDeleted {
            team_id,
            deleted_by: ctx.user_id,
            timestamp: Utc::now(),
        })
        .await;

        Ok(())
    }

    // ===== Members =====

    pub async fn list_members(
        &self,
        ctx: &SecurityCtx,
        team_id: Uuid,
    ) -> Result<Vec<MemberProfile>, IdentityError> {
        self.find_team(team_id).await?;
        self.require_member(team_id, ctx.user_id).await?;
        self.teams.list_members(team_id).await.map_err(internal)
    }

    pub async fn change_member_role(
        &self,
        ctx: &SecurityCtx,
        team_id: Uuid,
        user_id: Uuid,
        role: TeamRole,
    ) -> Result<TeamMember, IdentityError> {
        self.find_team(team_id).await?;
        self.require_manager(team_id, ctx.user_id).await?;

        if role == TeamRole::Owner {
            return Err(IdentityError::validation("team ownership cannot be assigned"));
        }

        let mut member = self
            .teams
            .find_member(team_id, user_id)
            .await
            .map_err(internal)?
            .ok_or_else(|| IdentityError::not_found("team member", user_id))?;

        if member.role == TeamRole::Owner {
            return Err(IdentityError::forbidden("the team owner's role cannot be changed"));
        }

        self.teams
            .update_member_role(team_id, user_id, role)
            .await
            .map_err(internal)?;
        member.role = role;

        tracing::info!(team_id = %team_id, user_id = %user_id, role = role.as_str(), "member role changed");
        Ok(member)
    }

    /// Remove a member, or leave the team when `user_id` is the caller
    pub async fn remove_member(
        &self,
        ctx: &SecurityCtx,
        team_id: Uuid,
        user_id: Uuid,
    ) -> Result<(), IdentityError> {
        self.find_team(team_id).await?;
        let actor_role = self.require_member(team_id, ctx.user_id).await?;

        let target = self
            .teams
            .find_member(team_id, user_id)
            .await
            .map_err(internal)?
            .ok_or_else(|| IdentityError::not_found("team member", user_id))?;

        if target.role == TeamRole::Owner {
            return Err(IdentityError::forbidden("the team owner cannot leave or be removed"));
        }

        if user_id != ctx.user_id {
            if !actor_role.can_manage() {
                return Err(IdentityError::forbidden("only team owners and admins can remove members"));
            }
            if target.role == TeamRole::Admin && actor_role != TeamRole::Owner {
                return Err(IdentityError::forbidden("only the team owner can remove an admin"));
            }
        }

        self.teams
            .remove_member(team_id, user_id)
            .await
            .map_err(internal)?;

        tracing::info!(team_id = %team_id, user_id = %user_id, removed_by = %ctx.user_id, "member removed");
        self.publish(IdentityEvent::MemberRemoved {
            team_id,
            user_id,
            removed_by: ctx.user_id,
            timestamp: Utc::now(),
        })
        .await;

        Ok(())
    }

    // ===== Invitations =====

    pub async fn invite(
        &self,
        ctx: &SecurityCtx,
        team_id: Uuid,
        email: &str,
        role: TeamRole,
    ) -> Result<Invitation, IdentityError> {
        let team = self.find_team(team_id).await?;
        self.require_manager(team_id, ctx.user_id).await?;

        if role == TeamRole::Owner {
            return Err(IdentityError::validation("cannot invite someone as team owner"));
        }
        let email = validation::normalize_email(email)?;

        let invitee = self
            .users
            .find_by_email(&email)
            .await
            .map_err(internal)?
            .map(|stored| stored.user);

        if let Some(invitee) = &invitee {
            let existing = self
                .teams
                .find_member(team_id, invitee.id)
                .await
                .map_err(internal)?;
            if existing.is_some() {
                return Err(IdentityError::conflict(format!(
                    "'{}' is already a member of this team",
                    email
                )));
            }
        }

        let now = Utc::now();
        if let Some(pending) = self
            .invitations
            .find_pending(team_id, &email)
            .await
            .map_err(internal)?
        {
            if !pending.is_expired_at(now) {
                return Ok(pending);
            }
            self.invitations
                .update_status(pending.id, InvitationStatus::Expired, None)
                .await
                .map_err(internal)?;
        }

        let ttl = chrono::Duration::from_std(self.config.invitation_ttl).map_err(|e| {
            tracing::error!(error = %e, "invitation ttl out of range");
            IdentityError::Internal
        })?;

        let invitation = Invitation {
            id: Uuid::new_v4(),
            team_id,
            email: email.clone(),
            role,
            token: generate_token(),
            invited_by: ctx.user_id,
            status: InvitationStatus::Pending,
            expires_at: now + ttl,
            created_at: now,
            responded_at: None,
        };

        let invitation = self
            .invitations
            .create(&invitation)
            .await
            .map_err(internal)?;

        tracing::info!(team_id = %team_id, invitation_id = %invitation.id, "invitation created");
        self.publish(IdentityEvent::InvitationCreated {
            team_id,
            team_name: team.name,
            invitation_id: invitation.id,
            email,
            invitee_id: invitee.map(|u| u.id),
            invited_by: ctx.user_id,
            timestamp: now,
        })
        .await;

        Ok(invitation)
    }

    pub async fn list_team_invitations(
        &self,
        ctx: &SecurityCtx,
        team_id: Uuid,
    ) -> Result<Vec<Invitation>, IdentityError> {
        self.find_team(team_id).await?;
        self.require_manager(team_id, ctx.user_id).await?;
        self.invitations
            .list_for_team(team_id)
            .await
            .map_err(internal)
    }

    /// Pending, unexpired invitations addressed to the caller
    pub async fn list_my_invitations(&self, ctx: &SecurityCtx) -> Result<Vec<Invitation>, IdentityError> {
        let now = Utc::now();
        let email = ctx.email.to_lowercase();
        let pending = self
            .invitations
            .list_pending_for_email(&email)
            .await
            .map_err(internal)?;

        Ok(pending
            .into_iter()
            .filter(|inv| !inv.is_expired_at(now))
            .collect())
    }

    pub async fn accept_invitation(
        &self,
        ctx: &SecurityCtx,
        token: &str,
    ) -> Result<TeamMembership, IdentityError> {
        let invitation = self.open_invitation_for(ctx, token).await?;
        let team = self.find_team(invitation.team_id).await?;
        let now = Utc::now();

        let existing = self
            .teams
            .find_member(team.id, ctx.user_id)
            .await
            .map_err(internal)?;

        let role = match existing {
            Some(member) => member.role,
            None => {
                let member = TeamMember {
                    team_id: team.id,
                    user_id: ctx.user_id,
                    role: invitation.role,
                    joined_at: now,
                };
                self.teams.add_member(&member).await.map_err(internal)?;

                self.publish(IdentityEvent::MemberJoined {
                    team_id: team.id,
                    user_id: ctx.user_id,
                    role: member.role.as_str().to_string(),
                    timestamp: now,
                })
                .await;
                member.role
            }
        };

        self.invitations
            .update_status(invitation.id, InvitationStatus::Accepted, Some(now))
            .await
            .map_err(internal)?;

        tracing::info!(team_id = %team.id, user_id = %ctx.user_id, "invitation accepted");
        Ok(TeamMembership { team, role })
    }

    pub async fn decline_invitation(&self, ctx: &SecurityCtx, token: &str) -> Result<(), IdentityError> {
        let invitation = self.open_invitation_for(ctx, token).await?;
        self.invitations
            .update_status(invitation.id, InvitationStatus::Declined, Some(Utc::now()))
            .await
            .map_err(internal)?;

        tracing::info!(invitation_id = %invitation.id, "invitation declined");
        Ok(())
    }

    pub async fn revoke_invitation(
        &self,
        ctx: &SecurityCtx,
        team_id: Uuid,
        invitation_id: Uuid,
    ) -> Result<(), IdentityError> {
        self.find_team(team_id).await?;
        self.require_manager(team_id, ctx.user_id).await?;

        let invitation = self
            .invitations
            .find_by_id(invitation_id)
            .await
            .map_err(internal)?
            .filter(|inv| inv.team_id == team_id)
            .ok_or_else(|| IdentityError::not_found("invitation", invitation_id))?;

        if invitation.status != InvitationStatus::Pending {
            return Err(IdentityError::conflict(format!(
                "invitation is already {}",
                invitation.status.as_str()
            )));
        }

        self.invitations
            .update_status(invitation_id, InvitationStatus::Revoked, Some(Utc::now()))
            .await
            .map_err(internal)?;

        tracing::info!(invitation_id = %invitation_id, revoked_by = %ctx.user_id, "invitation revoked");
        Ok(())
    }

    /// Resolve a token to a pending invitation addressed to the caller.
    ///
    /// Expired invitations are marked as such and rejected.
    async fn open_invitation_for(&self, ctx: &SecurityCtx, token: &str) -> Result<Invitation, IdentityError> {
        let invitation = self
            .invitations
            .find_by_token(token)
            .await
            .map_err(internal)?
            .ok_or_else(|| IdentityError::not_found("invitation", "token"))?;

        if !invitation.email.eq_ignore_ascii_case(&ctx.email) {
            return Err(IdentityError::forbidden("invitation is addressed to another email"));
        }
        if invitation.status != InvitationStatus::Pending {
            return Err(IdentityError::conflict(format!(
                "invitation is already {}",
                invitation.status.as_str()
            )));
        }
        if invitation.is_expired_at(Utc::now()) {
            self.invitations
                .update_status(invitation.id, InvitationStatus::Expired, None)
                .await
                .map_err(internal)?;
            return Err(IdentityError::InvitationExpired);
        }

        Ok(invitation)
    }

    // ===== Membership checks (also backing the native client) =====

    pub async fn team_role(&self, team_id: Uuid, user_id: Uuid) -> Result<Option<TeamRole>, IdentityError> {
        Ok(self
            .teams
            .find_member(team_id, user_id)
            .await
            .map_err(internal)?
            .map(|member| member.role))
    }

    pub async fn require_member(&self, team_id: Uuid, user_id: Uuid) -> Result<TeamRole, IdentityError> {
        match self.team_role(team_id, user_id).await? {
            Some(role) => Ok(role),
            None => {
                self.find_team(team_id).await?;
                Err(IdentityError::forbidden("not a member of this team"))
            }
        }
    }

    pub async fn team_member_ids(&self, team_id: Uuid) -> Result<Vec<Uuid>, IdentityError> {
        self.find_team(team_id).await?;
        let members = self.teams.list_members(team_id).await.map_err(internal)?;
        Ok(members.into_iter().map(|m| m.user_id).collect())
    }

    // ===== Helper Methods =====

    async fn find_team(&self, team_id: Uuid) -> Result<Team, IdentityError> {
        self.teams
            .find_by_id(team_id)
            .await
            .map_err(internal)?
            .ok_or_else(|| IdentityError::not_found("team", team_id))
    }

    async fn require_manager(&self, team_id: Uuid, user_id: Uuid) -> Result<TeamRole, IdentityError> {
        let role = self.require_member(team_id, user_id).await?;
        if !role.can_manage() {
            return Err(IdentityError::forbidden("team owner or admin role required"));
        }
        Ok(role)
    }

    /// Events never fail the operation that produced them
    async fn publish(&self, event: IdentityEvent) {
        let name = event.name();
        if let Err(e) = self.events.publish(event).await {
            tracing::warn!(event = name, error = %e, "failed to publish identity event");
        }
    }
}

fn require_platform_admin(ctx: &SecurityCtx) -> Result<(), IdentityError> {
    if ctx.is_admin() {
        Ok(())
    } else {
        Err(IdentityError::forbidden("administrator role required"))
    }
}

/// 32 random bytes, hex encoded
fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    rand::rng().fill(&mut bytes);
    hex::encode(bytes)
}
