//! Repository traits for data access
//!
//! Implementations are in infra/storage/repositories.rs

use crate::contract::SystemSetting;
use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait SettingsRepository: Send + Sync {
    /// Settings ordered by key; `public_only` hides non-public ones
    async fn list(&self, public_only: bool) -> Result<Vec<SystemSetting>>;

    async fn find(&self, key: &str) -> Result<Option<SystemSetting>>;

    /// Insert or replace the row for `setting.key`
    async fn upsert(&self, setting: &SystemSetting) -> Result<SystemSetting>;

    /// Returns false when no row matched
    async fn delete(&self, key: &str) -> Result<bool>;
}
