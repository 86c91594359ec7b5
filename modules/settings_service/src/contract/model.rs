use chrono::{DateTime, Utc};
use serde_json::Value;
use uuid::Uuid;

/// A system-wide setting
#[derive(Debug, Clone, PartialEq)]
pub struct SystemSetting {
    /// Dotted identifier, e.g. `ai.default_provider`
    pub key: String,
    pub value: Value,
    pub description: Option<String>,
    /// JSON Schema every new value must satisfy
    pub schema: Option<Value>,
    /// Readable by every authenticated user
    pub is_public: bool,
    /// Locked settings reject writes and deletes until unlocked
    pub locked: bool,
    pub updated_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Write request for a setting. Absent fields keep their stored value.
#[derive(Debug, Clone, Default)]
pub struct SettingUpdate {
    pub value: Value,
    pub description: Option<String>,
    pub schema: Option<Value>,
    pub is_public: Option<bool>,
}
