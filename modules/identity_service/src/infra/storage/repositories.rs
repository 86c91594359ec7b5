//! SeaORM repository implementations

use super::entity::{invitation, team, team_member, user};
use super::mapper::{new_user_active_model, parse_team_role};
use crate::contract::{Invitation, InvitationStatus, MemberProfile, Team, TeamMember, TeamRole, User};
use crate::domain::repository::{InvitationRepository, StoredUser, TeamRepository, UserRepository};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use brainforge_kit::Role;
use chrono::{DateTime, Utc};
use sea_orm::{
    prelude::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
};
use std::sync::Arc;
use uuid::Uuid;

// ===== User Repository =====

pub struct SeaOrmUserRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmUserRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn create(&self, user: &User, password_hash: &str) -> Result<User> {
        let active = new_user_active_model(user, password_hash);
        let model = active.insert(&*self.db).await?;
        model.try_into()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<StoredUser>> {
        user::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .map(StoredUser::try_from)
            .transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<StoredUser>> {
        user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&*self.db)
            .await?
            .map(StoredUser::try_from)
            .transpose()
    }

    async fn update(&self, user: &User) -> Result<User> {
        user::Entity::update_many()
            .col_expr(user::Column::DisplayName, Expr::value(user.display_name.clone()))
            .col_expr(user::Column::AvatarUrl, Expr::value(user.avatar_url.clone()))
            .col_expr(user::Column::Role, Expr::value(user.role.as_str()))
            .col_expr(user::Column::UpdatedAt, Expr::value(user.updated_at))
            .filter(user::Column::Id.eq(user.id))
            .exec(&*self.db)
            .await?;

        self.find_by_id(user.id)
            .await?
            .map(|stored| stored.user)
            .ok_or_else(|| anyhow!("user {} vanished during update", user.id))
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<()> {
        user::Entity::update_many()
            .col_expr(user::Column::PasswordHash, Expr::value(password_hash))
            .col_expr(user::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(user::Column::Id.eq(id))
            .exec(&*self.db)
            .await?;
        Ok(())
    }

    async fn touch_login(&self, id: Uuid, at: DateTime<Utc>) -> Result<()> {
        user::Entity::update_many()
            .col_expr(user::Column::LastLoginAt, Expr::value(at))
            .filter(user::Column::Id.eq(id))
            .exec(&*self.db)
            .await?;
        Ok(())
    }

    async fn set_role(&self, id: Uuid, role: Role) -> Result<()> {
        user::Entity::update_many()
            .col_expr(user::Column::Role, Expr::value(role.as_str()))
            .col_expr(user::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(user::Column::Id.eq(id))
            .exec(&*self.db)
            .await?;
        Ok(())
    }

    async fn list(&self, limit: u64, offset: u64) -> Result<Vec<User>> {
        user::Entity::find()
            .order_by_asc(user::Column::CreatedAt)
            .limit(limit)
            .offset(offset)
            .all(&*self.db)
            .await?
            .into_iter()
            .map(User::try_from)
            .collect()
    }

    async fn count(&self) -> Result<u64> {
        Ok(user::Entity::find().count(&*self.db).await?)
    }
}

// ===== Team Repository =====

pub struct SeaOrmTeamRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmTeamRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TeamRepository for SeaOrmTeamRepository {
    async fn create_with_owner(&self, team: &Team, owner: &TeamMember) -> Result<Team> {
        let txn = self.db.begin().await?;

        let created = team::ActiveModel::from(team).insert(&txn).await?;
        team_member::ActiveModel::from(owner).insert(&txn).await?;

        txn.commit().await?;
        Ok(created.into())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Team>> {
        Ok(team::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .map(Team::from))
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<(Team, TeamRole)>> {
        let rows = team_member::Entity::find()
            .filter(team_member::Column::UserId.eq(user_id))
            .find_also_related(team::Entity)
            .all(&*self.db)
            .await?;

        let mut teams = Vec::with_capacity(rows.len());
        for (member, team) in rows {
            if let Some(team) = team {
                teams.push((Team::from(team), parse_team_role(&member.role)?));
            }
        }
        teams.sort_by(|a, b| a.0.name.to_lowercase().cmp(&b.0.name.to_lowercase()));
        Ok(teams)
    }

    async fn update(&self, team: &Team) -> Result<Team> {
        let updated = team::ActiveModel::from(team).update(&*self.db).await?;
        Ok(updated.into())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let txn = self.db.begin().await?;

        team_member::Entity::delete_many()
            .filter(team_member::Column::TeamId.eq(id))
            .exec(&txn)
            .await?;
        invitation::Entity::delete_many()
            .filter(invitation::Column::TeamId.eq(id))
            .exec(&txn)
            .await?;
        team::Entity::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;
        Ok(())
    }

    async fn add_member(&self, member: &TeamMember) -> Result<()> {
        team_member::ActiveModel::from(member).insert(&*self.db).await?;
        Ok(())
    }

    async fn find_member(&self, team_id: Uuid, user_id: Uuid) -> Result<Option<TeamMember>> {
        team_member::Entity::find_by_id((team_id, user_id))
            .one(&*self.db)
            .await?
            .map(TeamMember::try_from)
            .transpose()
    }

    async fn list_members(&self, team_id: Uuid) -> Result<Vec<MemberProfile>> {
        let rows = team_member::Entity::find()
            .filter(team_member::Column::TeamId.eq(team_id))
            .order_by_asc(team_member::Column::JoinedAt)
            .find_also_related(user::Entity)
            .all(&*self.db)
            .await?;

        rows.into_iter()
            .filter_map(|(member, user)| user.map(|user| (member, user)))
            .map(|(member, user)| {
                Ok(MemberProfile {
                    user_id: member.user_id,
                    email: user.email,
                    display_name: user.display_name,
                    role: parse_team_role(&member.role)?,
                    joined_at: member.joined_at,
                })
            })
            .collect()
    }

    async fn update_member_role(&self, team_id: Uuid, user_id: Uuid, role: TeamRole) -> Result<()> {
        team_member::Entity::update_many()
            .col_expr(team_member::Column::Role, Expr::value(role.as_str()))
            .filter(team_member::Column::TeamId.eq(team_id))
            .filter(team_member::Column::UserId.eq(user_id))
            .exec(&*self.db)
            .await?;
        Ok(())
    }

    async fn remove_member(&self, team_id: Uuid, user_id: Uuid) -> Result<()> {
        team_member::Entity::delete_by_id((team_id, user_id))
            .exec(&*self.db)
            .await?;
        Ok(())
    }
}

// ===== Invitation Repository =====

pub struct SeaOrmInvitationRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmInvitationRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl InvitationRepository for SeaOrmInvitationRepository {
    async fn create(&self, invitation: &Invitation) -> Result<Invitation> {
        let model = invitation::ActiveModel::from(invitation)
            .insert(&*self.db)
            .await?;
        model.try_into()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Invitation>> {
        invitation::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .map(Invitation::try_from)
            .transpose()
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<Invitation>> {
        invitation::Entity::find()
            .filter(invitation::Column::Token.eq(token))
            .one(&*self.db)
            .await?
            .map(Invitation::try_from)
            .transpose()
    }

    async fn find_pending(&self, team_id: Uuid, email: &str) -> Result<Option<Invitation>> {
        invitation::Entity::find()
            .filter(invitation::Column::TeamId.eq(team_id))
            .filter(invitation::Column::Email.eq(email))
            .filter(invitation::Column::Status.eq(InvitationStatus::Pending.as_str()))
            .order_by_desc(invitation::Column::CreatedAt)
            .one(&*self.db)
            .await?
            .map(Invitation::try_from)
            .transpose()
    }

    async fn list_for_team(&self, team_id: Uuid) -> Result<Vec<Invitation>> {
        invitation::Entity::find()
            .filter(invitation::Column::TeamId.eq(team_id))
            .order_by_desc(invitation::Column::CreatedAt)
            .all(&*self.db)
            .await?
            .into_iter()
            .map(Invitation::try_from)
            .collect()
    }

    async fn list_pending_for_email(&self, email: &str) -> Result<Vec<Invitation>> {
        invitation::Entity::find()
            .filter(invitation::Column::Email.eq(email))
            .filter(invitation::Column::Status.eq(InvitationStatus::Pending.as_str()))
            .order_by_desc(invitation::Column::CreatedAt)
            .all(&*self.db)
            .await?
            .into_iter()
            .map(Invitation::try_from)
            .collect()
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: InvitationStatus,
        responded_at: Option<DateTime<Utc>>,
    ) -> Result<()> {
        invitation::Entity::update_many()
            .col_expr(invitation::Column::Status, Expr::value(status.as_str()))
            .col_expr(invitation::Column::RespondedAt, Expr::value(responded_at))
            .filter(invitation::Column::Id.eq(id))
            .exec(&*self.db)
            .await?;
        Ok(())
    }
}
