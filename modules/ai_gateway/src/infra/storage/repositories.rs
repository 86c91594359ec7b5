//! SeaORM repository implementations

use super::entity::{ai_usage_log, user_ai_key};
use crate::contract::{ProviderKind, UsageRecord, UserAiKey};
use crate::domain::repository::{AiKeyRepository, StoredKey, UsageRepository};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    prelude::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Select, TransactionTrait,
};
use std::sync::Arc;
use uuid::Uuid;

// ===== Key Repository =====

pub struct SeaOrmAiKeyRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmAiKeyRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AiKeyRepository for SeaOrmAiKeyRepository {
    async fn find(&self, user_id: Uuid, provider: ProviderKind) -> Result<Option<StoredKey>> {
        user_ai_key::Entity::find()
            .filter(user_ai_key::Column::UserId.eq(user_id))
            .filter(user_ai_key::Column::Provider.eq(provider.as_str()))
            .one(&*self.db)
            .await?
            .map(StoredKey::try_from)
            .transpose()
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<UserAiKey>> {
        user_ai_key::Entity::find()
            .filter(user_ai_key::Column::UserId.eq(user_id))
            .order_by_asc(user_ai_key::Column::Provider)
            .all(&*self.db)
            .await?
            .into_iter()
            .map(|model| StoredKey::try_from(model).map(|stored| stored.key))
            .collect()
    }

    async fn find_default(&self, user_id: Uuid) -> Result<Option<UserAiKey>> {
        user_ai_key::Entity::find()
            .filter(user_ai_key::Column::UserId.eq(user_id))
            .filter(user_ai_key::Column::IsDefault.eq(true))
            .one(&*self.db)
            .await?
            .map(|model| StoredKey::try_from(model).map(|stored| stored.key))
            .transpose()
    }

    async fn create(&self, key: &StoredKey) -> Result<UserAiKey> {
        let model = user_ai_key::ActiveModel::from(key).insert(&*self.db).await?;
        Ok(StoredKey::try_from(model)?.key)
    }

    async fn update(&self, key: &StoredKey) -> Result<UserAiKey> {
        let model = user_ai_key::ActiveModel::from(key).update(&*self.db).await?;
        Ok(StoredKey::try_from(model)?.key)
    }

    async fn delete(&self, user_id: Uuid, provider: ProviderKind) -> Result<bool> {
        let result = user_ai_key::Entity::delete_many()
            .filter(user_ai_key::Column::UserId.eq(user_id))
            .filter(user_ai_key::Column::Provider.eq(provider.as_str()))
            .exec(&*self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }

    async fn set_default(&self, user_id: Uuid, provider: ProviderKind) -> Result<()> {
        let txn = self.db.begin().await?;
        user_ai_key::Entity::update_many()
            .col_expr(user_ai_key::Column::IsDefault, Expr::value(false))
            .filter(user_ai_key::Column::UserId.eq(user_id))
            .exec(&txn)
            .await?;
        user_ai_key::Entity::update_many()
            .col_expr(user_ai_key::Column::IsDefault, Expr::value(true))
            .col_expr(user_ai_key::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(user_ai_key::Column::UserId.eq(user_id))
            .filter(user_ai_key::Column::Provider.eq(provider.as_str()))
            .exec(&txn)
            .await?;
        txn.commit().await?;
        Ok(())
    }
}

// ===== Usage Repository =====

pub struct SeaOrmUsageRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmUsageRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    fn for_user(user_id: Uuid) -> Select<ai_usage_log::Entity> {
        ai_usage_log::Entity::find().filter(ai_usage_log::Column::UserId.eq(user_id))
    }
}

#[async_trait]
impl UsageRepository for SeaOrmUsageRepository {
    async fn record(&self, record: &UsageRecord) -> Result<()> {
        ai_usage_log::ActiveModel::from(record).insert(&*self.db).await?;
        Ok(())
    }

    async fn list_for_user(&self, user_id: Uuid, limit: u64, offset: u64) -> Result<Vec<UsageRecord>> {
        Self::for_user(user_id)
            .order_by_desc(ai_usage_log::Column::CreatedAt)
            .limit(limit)
            .offset(offset)
            .all(&*self.db)
            .await?
            .into_iter()
            .map(UsageRecord::try_from)
            .collect()
    }

    async fn count_for_user(&self, user_id: Uuid) -> Result<u64> {
        Ok(Self::for_user(user_id).count(&*self.db).await?)
    }

    async fn list_in_range(
        &self,
        user_id: Option<Uuid>,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<Vec<UsageRecord>> {
        let mut query = ai_usage_log::Entity::find();
        if let Some(user_id) = user_id {
            query = query.filter(ai_usage_log::Column::UserId.eq(user_id));
        }
        if let Some(from) = from {
            query = query.filter(ai_usage_log::Column::CreatedAt.gte(from));
        }
        if let Some(to) = to {
            query = query.filter(ai_usage_log::Column::CreatedAt.lt(to));
        }

        query
            .order_by_asc(ai_usage_log::Column::CreatedAt)
            .all(&*self.db)
            .await?
            .into_iter()
            .map(UsageRecord::try_from)
            .collect()
    }
}
