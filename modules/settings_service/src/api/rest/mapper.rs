//! Mapping between DTOs and contract types

use super::dto::{SettingDto, UpsertSettingRequest};
use crate::contract::{SettingUpdate, SystemSetting};

impl From<SystemSetting> for SettingDto {
    fn from(setting: SystemSetting) -> Self {
        Self {
            key: setting.key,
            value: setting.value,
            description: setting.description,
            schema: setting.schema,
            is_public: setting.is_public,
            locked: setting.locked,
            updated_by: setting.updated_by,
            created_at: setting.created_at,
            updated_at: setting.updated_at,
        }
    }
}

impl From<UpsertSettingRequest> for SettingUpdate {
    fn from(req: UpsertSettingRequest) -> Self {
        Self {
            value: req.value,
            description: req.description,
            schema: req.schema,
            is_public: req.is_public,
        }
    }
}
