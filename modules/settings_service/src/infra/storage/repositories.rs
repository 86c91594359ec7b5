//! SeaORM repository implementations

use super::entity;
use crate::contract::SystemSetting;
use crate::domain::repository::SettingsRepository;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use sea_orm::{
    sea_query::OnConflict, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};
use std::sync::Arc;

pub struct SeaOrmSettingsRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmSettingsRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SettingsRepository for SeaOrmSettingsRepository {
    async fn list(&self, public_only: bool) -> Result<Vec<SystemSetting>> {
        let mut query = entity::Entity::find().order_by_asc(entity::Column::Key);
        if public_only {
            query = query.filter(entity::Column::IsPublic.eq(true));
        }
        let models = query.all(&*self.db).await?;
        Ok(models.into_iter().map(SystemSetting::from).collect())
    }

    async fn find(&self, key: &str) -> Result<Option<SystemSetting>> {
        let model = entity::Entity::find_by_id(key.to_string()).one(&*self.db).await?;
        Ok(model.map(SystemSetting::from))
    }

    async fn upsert(&self, setting: &SystemSetting) -> Result<SystemSetting> {
        let active: entity::ActiveModel = setting.into();
        entity::Entity::insert(active)
            .on_conflict(
                OnConflict::column(entity::Column::Key)
                    .update_columns([
                        entity::Column::Value,
                        entity::Column::Description,
                        entity::Column::Schema,
                        entity::Column::IsPublic,
                        entity::Column::Locked,
                        entity::Column::UpdatedBy,
                        entity::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&*self.db)
            .await?;

        self.find(&setting.key)
            .await?
            .ok_or_else(|| anyhow!("setting {} vanished during upsert", setting.key))
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        let result = entity::Entity::delete_by_id(key.to_string()).exec(&*self.db).await?;
        Ok(result.rows_affected > 0)
    }
}
