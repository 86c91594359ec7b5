//! SeaORM repository implementations

use super::entity::{brainstorm_session, diagram};
use crate::contract::{BrainstormSession, Diagram};
use crate::domain::repository::{DiagramRepository, SessionRepository};
use anyhow::Result;
use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use std::sync::Arc;
use uuid::Uuid;

// ===== Session Repository =====

pub struct SeaOrmSessionRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmSessionRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SessionRepository for SeaOrmSessionRepository {
    async fn create(&self, session: &BrainstormSession) -> Result<BrainstormSession> {
        brainstorm_session::ActiveModel::try_from(session)?
            .insert(&*self.db)
            .await?
            .try_into()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<BrainstormSession>> {
        brainstorm_session::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .map(BrainstormSession::try_from)
            .transpose()
    }

    async fn list_by_team(&self, team_id: Uuid) -> Result<Vec<BrainstormSession>> {
        brainstorm_session::Entity::find()
            .filter(brainstorm_session::Column::TeamId.eq(team_id))
            .order_by_desc(brainstorm_session::Column::CreatedAt)
            .all(&*self.db)
            .await?
            .into_iter()
            .map(BrainstormSession::try_from)
            .collect()
    }

    async fn update(&self, session: &BrainstormSession) -> Result<BrainstormSession> {
        brainstorm_session::ActiveModel::try_from(session)?
            .update(&*self.db)
            .await?
            .try_into()
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        brainstorm_session::Entity::delete_by_id(id).exec(&*self.db).await?;
        Ok(())
    }

    async fn delete_by_team(&self, team_id: Uuid) -> Result<u64> {
        let result = brainstorm_session::Entity::delete_many()
            .filter(brainstorm_session::Column::TeamId.eq(team_id))
            .exec(&*self.db)
            .await?;
        Ok(result.rows_affected)
    }
}

// ===== Diagram Repository =====

pub struct SeaOrmDiagramRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmDiagramRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl DiagramRepository for SeaOrmDiagramRepository {
    async fn create(&self, diagram: &Diagram) -> Result<Diagram> {
        diagram::ActiveModel::from(diagram).insert(&*self.db).await?.try_into()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Diagram>> {
        diagram::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .map(Diagram::try_from)
            .transpose()
    }

    async fn list_by_team(&self, team_id: Uuid) -> Result<Vec<Diagram>> {
        diagram::Entity::find()
            .filter(diagram::Column::TeamId.eq(team_id))
            .order_by_desc(diagram::Column::UpdatedAt)
            .all(&*self.db)
            .await?
            .into_iter()
            .map(Diagram::try_from)
            .collect()
    }

    async fn update(&self, diagram: &Diagram) -> Result<Diagram> {
        diagram::ActiveModel::from(diagram).update(&*self.db).await?.try_into()
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        diagram::Entity::delete_by_id(id).exec(&*self.db).await?;
        Ok(())
    }

    async fn delete_by_team(&self, team_id: Uuid) -> Result<u64> {
        let result = diagram::Entity::delete_many()
            .filter(diagram::Column::TeamId.eq(team_id))
            .exec(&*self.db)
            .await?;
        Ok(result.rows_affected)
    }
}
