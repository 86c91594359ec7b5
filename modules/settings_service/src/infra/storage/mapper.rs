//! Mapping between SeaORM models and contract types

use super::entity;
use crate::contract::SystemSetting;
use sea_orm::Set;

impl From<entity::Model> for SystemSetting {
    fn from(model: entity::Model) -> Self {
        Self {
            key: model.key,
            value: model.value,
            description: model.description,
            schema: model.schema,
            is_public: model.is_public,
            locked: model.locked,
            updated_by: model.updated_by,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<&SystemSetting> for entity::ActiveModel {
    fn from(setting: &SystemSetting) -> Self {
        Self {
            key: Set(setting.key.clone()),
            value: Set(setting.value.clone()),
            description: Set(setting.description.clone()),
            schema: Set(setting.schema.clone()),
            is_public: Set(setting.is_public),
            locked: Set(setting.locked),
            updated_by: Set(setting.updated_by),
            created_at: Set(setting.created_at),
            updated_at: Set(setting.updated_at),
        }
    }
}
