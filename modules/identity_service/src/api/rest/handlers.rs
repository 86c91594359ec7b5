//! HTTP request handlers - thin layer that delegates to domain service

use super::dto::*;
use super::error::map_domain_error;
use super::mapper::{parse_platform_role, parse_team_role};
use crate::contract::{NewTeam, ProfilePatch, TeamPatch};
use crate::domain::Service;
use axum::{
    extract::{Path, Query},
    http::StatusCode,
    Extension, Json,
};
use brainforge_kit::{PageQuery, Problem, SecurityCtx};
use std::sync::Arc;
use uuid::Uuid;

// ===== Auth Handlers =====

pub async fn register(
    Extension(service): Extension<Arc<Service>>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), Problem> {
    let session = service
        .register(&req.email, &req.password, &req.display_name)
        .await
        .map_err(map_domain_error)?;

    Ok((StatusCode::CREATED, Json(session.into())))
}

pub async fn login(
    Extension(service): Extension<Arc<Service>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, Problem> {
    let session = service
        .login(&req.email, &req.password)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(session.into()))
}

pub async fn me(
    Extension(service): Extension<Arc<Service>>,
    ctx: SecurityCtx,
) -> Result<Json<UserDto>, Problem> {
    let user = service.get_user(ctx.user_id).await.map_err(map_domain_error)?;
    Ok(Json(user.into()))
}

// ===== User Handlers =====

pub async fn update_profile(
    Extension(service): Extension<Arc<Service>>,
    ctx: SecurityCtx,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<UserDto>, Problem> {
    let patch = ProfilePatch {
        display_name: req.display_name,
        avatar_url: req.avatar_url,
    };
    let user = service
        .update_profile(&ctx, patch)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(user.into()))
}

pub async fn change_password(
    Extension(service): Extension<Arc<Service>>,
    ctx: SecurityCtx,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<StatusCode, Problem> {
    service
        .change_password(&ctx, &req.current_password, &req.new_password)
        .await
        .map_err(map_domain_error)?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_users(
    Extension(service): Extension<Arc<Service>>,
    ctx: SecurityCtx,
    Query(page): Query<PageQuery>,
) -> Result<Json<UsersListResponse>, Problem> {
    let page = service
        .list_users(&ctx, page)
        .await
        .map_err(map_domain_error)?
        .map(UserDto::from);

    Ok(Json(UsersListResponse {
        items: page.items,
        total: page.total,
        limit: page.limit,
        offset: page.offset,
    }))
}

pub async fn set_user_role(
    Extension(service): Extension<Arc<Service>>,
    ctx: SecurityCtx,
    Path(user_id): Path<Uuid>,
    Json(req): Json<SetRoleRequest>,
) -> Result<Json<UserDto>, Problem> {
    let role = parse_platform_role(&req.role)?;
    let user = service
        .set_user_role(&ctx, user_id, role)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(user.into()))
}

// ===== Team Handlers =====

pub async fn create_team(
    Extension(service): Extension<Arc<Service>>,
    ctx: SecurityCtx,
    Json(req): Json<CreateTeamRequest>,
) -> Result<(StatusCode, Json<TeamDto>), Problem> {
    let membership = service
        .create_team(
            &ctx,
            NewTeam {
                name: req.name,
                description: req.description,
            },
        )
        .await
        .map_err(map_domain_error)?;

    Ok((StatusCode::CREATED, Json(membership.into())))
}

pub async fn list_teams(
    Extension(service): Extension<Arc<Service>>,
    ctx: SecurityCtx,
) -> Result<Json<Vec<TeamDto>>, Problem> {
    let teams = service.list_my_teams(&ctx).await.map_err(map_domain_error)?;
    Ok(Json(teams.into_iter().map(TeamDto::from).collect()))
}

pub async fn get_team(
    Extension(service): Extension<Arc<Service>>,
    ctx: SecurityCtx,
    Path(team_id): Path<Uuid>,
) -> Result<Json<TeamDto>, Problem> {
    let membership = service
        .get_team(&ctx, team_id)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(membership.into()))
}

pub async fn update_team(
    Extension(service): Extension<Arc<Service>>,
    ctx: SecurityCtx,
    Path(team_id): Path<Uuid>,
    Json(req): Json<UpdateTeamRequest>,
) -> Result<Json<TeamDto>, Problem> {
    let patch = TeamPatch {
        name: req.name,
        description: req.description,
    };
    let team = service
        .update_team(&ctx, team_id, patch)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(team.into()))
}

pub async fn delete_team(
    Extension(service): Extension<Arc<Service>>,
    ctx: SecurityCtx,
    Path(team_id): Path<Uuid>,
) -> Result<StatusCode, Problem> {
    service
        .delete_team(&ctx, team_id)
        .await
        .map_err(map_domain_error)?;

    Ok(StatusCode::NO_CONTENT)
}

// ===== Member Handlers =====

pub async fn list_members(
    Extension(service): Extension<Arc<Service>>,
    ctx: SecurityCtx,
    Path(team_id): Path<Uuid>,
) -> Result<Json<Vec<MemberDto>>, Problem> {
    let members = service
        .list_members(&ctx, team_id)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(members.into_iter().map(MemberDto::from).collect()))
}

pub async fn change_member_role(
    Extension(service): Extension<Arc<Service>>,
    ctx: SecurityCtx,
    Path((team_id, user_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<ChangeMemberRoleRequest>,
) -> Result<Json<MembershipDto>, Problem> {
    let role = parse_team_role(&req.role)?;
    let member = service
        .change_member_role(&ctx, team_id, user_id, role)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(member.into()))
}

pub async fn remove_member(
    Extension(service): Extension<Arc<Service>>,
    ctx: SecurityCtx,
    Path((team_id, user_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, Problem> {
    service
        .remove_member(&ctx, team_id, user_id)
        .await
        .map_err(map_domain_error)?;

    Ok(StatusCode::NO_CONTENT)
}

// ===== Invitation Handlers =====

pub async fn invite(
    Extension(service): Extension<Arc<Service>>,
    ctx: SecurityCtx,
    Path(team_id): Path<Uuid>,
    Json(req): Json<InviteRequest>,
) -> Result<(StatusCode, Json<InvitationDto>), Problem> {
    let role = parse_team_role(&req.role)?;
    let invitation = service
        .invite(&ctx, team_id, &req.email, role)
        .await
        .map_err(map_domain_error)?;

    Ok((StatusCode::CREATED, Json(invitation.into())))
}

pub async fn list_team_invitations(
    Extension(service): Extension<Arc<Service>>,
    ctx: SecurityCtx,
    Path(team_id): Path<Uuid>,
) -> Result<Json<Vec<InvitationDto>>, Problem> {
    let invitations = service
        .list_team_invitations(&ctx, team_id)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(invitations.into_iter().map(InvitationDto::from).collect()))
}

pub async fn revoke_invitation(
    Extension(service): Extension<Arc<Service>>,
    ctx: SecurityCtx,
    Path((team_id, invitation_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, Problem> {
    service
        .revoke_invitation(&ctx, team_id, invitation_id)
        .await
        .map_err(map_domain_error)?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_my_invitations(
    Extension(service): Extension<Arc<Service>>,
    ctx: SecurityCtx,
) -> Result<Json<Vec<InvitationDto>>, Problem> {
    let invitations = service
        .list_my_invitations(&ctx)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(invitations.into_iter().map(InvitationDto::from).collect()))
}

pub async fn accept_invitation(
    Extension(service): Extension<Arc<Service>>,
    ctx: SecurityCtx,
    Path(token): Path<String>,
) -> Result<Json<TeamDto>, Problem> {
    let membership = service
        .accept_invitation(&ctx, &token)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(membership.into()))
}

pub async fn decline_invitation(
    Extension(service): Extension<Arc<Service>>,
    ctx: SecurityCtx,
    Path(token): Path<String>,
) -> Result<StatusCode, Problem> {
    service
        .decline_invitation(&ctx, &token)
        .await
        .map_err(map_domain_error)?;

    Ok(StatusCode::NO_CONTENT)
}
