//! Repository traits - storage abstraction for the domain

use crate::contract::{ProviderKind, UsageRecord, UserAiKey};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Key metadata together with its encrypted material
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredKey {
    pub key: UserAiKey,
    pub encrypted_key: String,
}

#[async_trait]
pub trait AiKeyRepository: Send + Sync {
    async fn find(&self, user_id: Uuid, provider: ProviderKind) -> Result<Option<StoredKey>>;

    /// Keys of a user ordered by provider
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<UserAiKey>>;

    async fn find_default(&self, user_id: Uuid) -> Result<Option<UserAiKey>>;

    async fn create(&self, key: &StoredKey) -> Result<UserAiKey>;

    async fn update(&self, key: &StoredKey) -> Result<UserAiKey>;

    /// Returns false when there was nothing to delete
    async fn delete(&self, user_id: Uuid, provider: ProviderKind) -> Result<bool>;

    /// Make `provider` the only default key of the user
    async fn set_default(&self, user_id: Uuid, provider: ProviderKind) -> Result<()>;
}

#[async_trait]
pub trait UsageRepository: Send + Sync {
    async fn record(&self, record: &UsageRecord) -> Result<()>;

    /// Newest first
    async fn list_for_user(&self, user_id: Uuid, limit: u64, offset: u64) -> Result<Vec<UsageRecord>>;

    async fn count_for_user(&self, user_id: Uuid) -> Result<u64>;

    /// Rows in `[from, to)`; every user when `user_id` is `None`
    async fn list_in_range(
        &self,
        user_id: Option<Uuid>,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<Vec<UsageRecord>>;
}
