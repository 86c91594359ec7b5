//! REST DTOs with serde derives for HTTP API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Setting as returned to clients
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SettingDto {
    #[schema(example = "ai.default_provider")]
    pub key: String,
    #[schema(value_type = Object)]
    pub value: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub schema: Option<serde_json::Value>,
    pub is_public: bool,
    pub locked: bool,
    pub updated_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// PUT /settings/{key} body
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpsertSettingRequest {
    #[schema(value_type = Object)]
    pub value: serde_json::Value,
    pub description: Option<String>,
    /// JSON Schema for this and later values; omit to keep the stored one
    #[schema(value_type = Option<Object>)]
    pub schema: Option<serde_json::Value>,
    pub is_public: Option<bool>,
}

/// PUT /settings/{key}/lock body
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LockSettingRequest {
    pub locked: bool,
}
