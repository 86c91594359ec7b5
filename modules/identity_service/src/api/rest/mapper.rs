//! Conversions between REST DTOs and contract models

use super::dto::*;
use crate::contract::{
    AuthSession, Invitation, MemberProfile, Team, TeamMember, TeamMembership, TeamRole, User,
};
use brainforge_kit::{Problem, Role};

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            display_name: user.display_name,
            role: user.role.as_str().to_string(),
            avatar_url: user.avatar_url,
            created_at: user.created_at,
            updated_at: user.updated_at,
            last_login_at: user.last_login_at,
        }
    }
}

impl From<AuthSession> for AuthResponse {
    fn from(session: AuthSession) -> Self {
        Self {
            user: session.user.into(),
            token: session.token,
            expires_at: session.expires_at,
        }
    }
}

impl From<Team> for TeamDto {
    fn from(team: Team) -> Self {
        Self {
            id: team.id,
            name: team.name,
            description: team.description,
            owner_id: team.owner_id,
            my_role: None,
            created_at: team.created_at,
            updated_at: team.updated_at,
        }
    }
}

impl From<TeamMembership> for TeamDto {
    fn from(membership: TeamMembership) -> Self {
        let mut dto = TeamDto::from(membership.team);
        dto.my_role = Some(membership.role.as_str().to_string());
        dto
    }
}

impl From<MemberProfile> for MemberDto {
    fn from(member: MemberProfile) -> Self {
        Self {
            user_id: member.user_id,
            email: member.email,
            display_name: member.display_name,
            role: member.role.as_str().to_string(),
            joined_at: member.joined_at,
        }
    }
}

impl From<TeamMember> for MembershipDto {
    fn from(member: TeamMember) -> Self {
        Self {
            team_id: member.team_id,
            user_id: member.user_id,
            role: member.role.as_str().to_string(),
            joined_at: member.joined_at,
        }
    }
}

impl From<Invitation> for InvitationDto {
    fn from(invitation: Invitation) -> Self {
        Self {
            id: invitation.id,
            team_id: invitation.team_id,
            email: invitation.email,
            role: invitation.role.as_str().to_string(),
            token: invitation.token,
            invited_by: invitation.invited_by,
            status: invitation.status.as_str().to_string(),
            expires_at: invitation.expires_at,
            created_at: invitation.created_at,
            responded_at: invitation.responded_at,
        }
    }
}

pub fn parse_team_role(role: &str) -> Result<TeamRole, Problem> {
    TeamRole::parse(&role.to_lowercase())
        .ok_or_else(|| Problem::bad_request(format!("unknown team role '{}'", role)))
}

pub fn parse_platform_role(role: &str) -> Result<Role, Problem> {
    Role::parse(&role.to_lowercase())
        .ok_or_else(|| Problem::bad_request(format!("unknown role '{}'", role)))
}
