//! Entity to model mappers
//!
//! Conversions between SeaORM entities and contract models

use super::entity::{invitation, team, team_member, user};
use crate::contract::{Invitation, InvitationStatus, Team, TeamMember, TeamRole, User};
use crate::domain::StoredUser;
use anyhow::anyhow;
use brainforge_kit::Role;
use sea_orm::ActiveValue::Set;

// ===== User conversions =====

impl TryFrom<user::Model> for StoredUser {
    type Error = anyhow::Error;

    fn try_from(entity: user::Model) -> Result<Self, Self::Error> {
        let role = Role::parse(&entity.role)
            .ok_or_else(|| anyhow!("unknown user role '{}' for user {}", entity.role, entity.id))?;

        Ok(Self {
            user: User {
                id: entity.id,
                email: entity.email,
                display_name: entity.display_name,
                role,
                avatar_url: entity.avatar_url,
                created_at: entity.created_at,
                updated_at: entity.updated_at,
                last_login_at: entity.last_login_at,
            },
            password_hash: entity.password_hash,
        })
    }
}

impl TryFrom<user::Model> for User {
    type Error = anyhow::Error;

    fn try_from(entity: user::Model) -> Result<Self, Self::Error> {
        StoredUser::try_from(entity).map(|stored| stored.user)
    }
}

pub fn new_user_active_model(model: &User, password_hash: &str) -> user::ActiveModel {
    user::ActiveModel {
        id: Set(model.id),
        email: Set(model.email.clone()),
        display_name: Set(model.display_name.clone()),
        password_hash: Set(password_hash.to_string()),
        role: Set(model.role.as_str().to_string()),
        avatar_url: Set(model.avatar_url.clone()),
        created_at: Set(model.created_at),
        updated_at: Set(model.updated_at),
        last_login_at: Set(model.last_login_at),
    }
}

// ===== Team conversions =====

impl From<team::Model> for Team {
    fn from(entity: team::Model) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            description: entity.description,
            owner_id: entity.owner_id,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

impl From<&Team> for team::ActiveModel {
    fn from(model: &Team) -> Self {
        Self {
            id: Set(model.id),
            name: Set(model.name.clone()),
            description: Set(model.description.clone()),
            owner_id: Set(model.owner_id),
            created_at: Set(model.created_at),
            updated_at: Set(model.updated_at),
        }
    }
}

// ===== Membership conversions =====

pub fn parse_team_role(raw: &str) -> anyhow::Result<TeamRole> {
    TeamRole::parse(raw).ok_or_else(|| anyhow!("unknown team role '{}'", raw))
}

impl TryFrom<team_member::Model> for TeamMember {
    type Error = anyhow::Error;

    fn try_from(entity: team_member::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            team_id: entity.team_id,
            user_id: entity.user_id,
            role: parse_team_role(&entity.role)?,
            joined_at: entity.joined_at,
        })
    }
}

impl From<&TeamMember> for team_member::ActiveModel {
    fn from(model: &TeamMember) -> Self {
        Self {
            team_id: Set(model.team_id),
            user_id: Set(model.user_id),
            role: Set(model.role.as_str().to_string()),
            joined_at: Set(model.joined_at),
        }
    }
}

// ===== Invitation conversions =====

impl TryFrom<invitation::Model> for Invitation {
    type Error = anyhow::Error;

    fn try_from(entity: invitation::Model) -> Result<Self, Self::Error> {
        let status = InvitationStatus::parse(&entity.status)
            .ok_or_else(|| anyhow!("unknown invitation status '{}'", entity.status))?;

        Ok(Self {
            id: entity.id,
            team_id: entity.team_id,
            email: entity.email,
            role: parse_team_role(&entity.role)?,
            token: entity.token,
            invited_by: entity.invited_by,
            status,
            expires_at: entity.expires_at,
            created_at: entity.created_at,
            responded_at: entity.responded_at,
        })
    }
}

impl From<&Invitation> for invitation::ActiveModel {
    fn from(model: &Invitation) -> Self {
        Self {
            id: Set(model.id),
            team_id: Set(model.team_id),
            email: Set(model.email.clone()),
            role: Set(model.role.as_str().to_string()),
            token: Set(model.token.clone()),
            invited_by: Set(model.invited_by),
            status: Set(model.status.as_str().to_string()),
            expires_at: Set(model.expires_at),
            created_at: Set(model.created_at),
            responded_at: Set(model.responded_at),
        }
    }
}
