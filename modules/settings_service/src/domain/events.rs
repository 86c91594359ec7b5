/// Domain events for settings service
///
/// Published after a write is stored. Publishing failures are logged and
/// never fail the write.
use crate::contract::SystemSetting;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum SettingsEvent {
    /// Setting was created or updated
    SettingUpserted {
        key: String,
        value: serde_json::Value,
        is_public: bool,
        is_new: bool,
        updated_by: Uuid,
        timestamp: DateTime<Utc>,
    },
    /// Setting was locked or unlocked
    SettingLocked {
        key: String,
        locked: bool,
        updated_by: Uuid,
        timestamp: DateTime<Utc>,
    },
    SettingDeleted {
        key: String,
        deleted_by: Uuid,
        timestamp: DateTime<Utc>,
    },
}

impl SettingsEvent {
    pub fn upserted(setting: &SystemSetting, is_new: bool, user_id: Uuid) -> Self {
        SettingsEvent::SettingUpserted {
            key: setting.key.clone(),
            value: setting.value.clone(),
            is_public: setting.is_public,
            is_new,
            updated_by: user_id,
            timestamp: Utc::now(),
        }
    }

    pub fn locked(key: &str, locked: bool, user_id: Uuid) -> Self {
        SettingsEvent::SettingLocked {
            key: key.to_string(),
            locked,
            updated_by: user_id,
            timestamp: Utc::now(),
        }
    }

    pub fn deleted(key: &str, user_id: Uuid) -> Self {
        SettingsEvent::SettingDeleted {
            key: key.to_string(),
            deleted_by: user_id,
            timestamp: Utc::now(),
        }
    }

    pub fn key(&self) -> &str {
        match self {
            SettingsEvent::SettingUpserted { key, .. }
            | SettingsEvent::SettingLocked { key, .. }
            | SettingsEvent::SettingDeleted { key, .. } => key,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SettingsEvent::SettingUpserted { .. } => "setting_upserted",
            SettingsEvent::SettingLocked { .. } => "setting_locked",
            SettingsEvent::SettingDeleted { .. } => "setting_deleted",
        }
    }
}

/// Event publisher trait for settings events
#[async_trait::async_trait]
pub trait SettingsEventPublisher: Send + Sync {
    async fn publish(&self, event: SettingsEvent) -> anyhow::Result<()>;
}

/// No-op event publisher for testing or when events are disabled
pub struct NoOpSettingsEventPublisher;

#[async_trait::async_trait]
impl SettingsEventPublisher for NoOpSettingsEventPublisher {
    async fn publish(&self, _event: SettingsEvent) -> anyhow::Result<()> {
        Ok(())
    }
}
