//! Domain service - business logic orchestration

use super::events::{SettingsEvent, SettingsEventPublisher};
use super::repository::SettingsRepository;
use super::validation::{compile_schema, validate_against_schema, validate_key};
use crate::config::{Config, SeedSetting};
use crate::contract::{SettingUpdate, SettingsError, SystemSetting};
use brainforge_kit::SecurityCtx;
use chrono::Utc;
use std::sync::Arc;

fn internal(error: anyhow::Error) -> SettingsError {
    tracing::error!(error = ?error, "settings storage failure");
    SettingsError::Internal
}

/// Domain service for system settings
pub struct Service {
    repo: Arc<dyn SettingsRepository>,
    event_publisher: Arc<dyn SettingsEventPublisher>,
    config: Config,
}

impl Service {
    pub fn new(
        repo: Arc<dyn SettingsRepository>,
        event_publisher: Arc<dyn SettingsEventPublisher>,
        config: Config,
    ) -> Self {
        Self {
            repo,
            event_publisher,
            config,
        }
    }

    // ===== Reads =====

    /// Admins see every setting; members only the public ones
    pub async fn list_settings(&self, ctx: &SecurityCtx) -> Result<Vec<SystemSetting>, SettingsError> {
        self.repo.list(!ctx.is_admin()).await.map_err(internal)
    }

    /// Non-public settings do not exist for non-admins
    pub async fn get_setting(&self, ctx: &SecurityCtx, key: &str) -> Result<SystemSetting, SettingsError> {
        validate_key(key)?;
        match self.repo.find(key).await.map_err(internal)? {
            Some(setting) if setting.is_public || ctx.is_admin() => Ok(setting),
            _ => Err(SettingsError::not_found(key)),
        }
    }

    // ===== Writes (admin only) =====

    /// Create or replace a setting's value.
    ///
    /// The value is checked against the schema in the request, or the
    /// stored schema when the request carries none.
    pub async fn upsert_setting(
        &self,
        ctx: &SecurityCtx,
        key: &str,
        update: SettingUpdate,
    ) -> Result<SystemSetting, SettingsError> {
        require_admin(ctx)?;
        validate_key(key)?;
        self.check_size(&update.value)?;

        let existing = self.repo.find(key).await.map_err(internal)?;
        if existing.as_ref().is_some_and(|s| s.locked) {
            return Err(SettingsError::locked(key));
        }

        let schema = update
            .schema
            .clone()
            .or_else(|| existing.as_ref().and_then(|s| s.schema.clone()));
        if let Some(schema) = &schema {
            if self.config.enable_schema_validation {
                validate_against_schema(&update.value, schema)?;
            } else {
                compile_schema(schema)?;
            }
        }

        let now = Utc::now();
        let is_new = existing.is_none();
        let setting = match existing {
            Some(current) => SystemSetting {
                value: update.value,
                description: update.description.or(current.description),
                schema,
                is_public: update.is_public.unwrap_or(current.is_public),
                updated_by: Some(ctx.user_id),
                updated_at: now,
                ..current
            },
            None => SystemSetting {
                key: key.to_string(),
                value: update.value,
                description: update.description,
                schema,
                is_public: update.is_public.unwrap_or(false),
                locked: false,
                updated_by: Some(ctx.user_id),
                created_at: now,
                updated_at: now,
            },
        };

        let saved = self.repo.upsert(&setting).await.map_err(internal)?;
        tracing::info!(key, is_new, user_id = %ctx.user_id, "setting saved");
        self.publish(SettingsEvent::upserted(&saved, is_new, ctx.user_id)).await;
        Ok(saved)
    }

    /// Lock or unlock a setting. Locking an already locked setting is a no-op.
    pub async fn lock_setting(
        &self,
        ctx: &SecurityCtx,
        key: &str,
        locked: bool,
    ) -> Result<SystemSetting, SettingsError> {
        require_admin(ctx)?;
        validate_key(key)?;

        let mut setting = self
            .repo
            .find(key)
            .await
            .map_err(internal)?
            .ok_or_else(|| SettingsError::not_found(key))?;
        if setting.locked == locked {
            return Ok(setting);
        }

        setting.locked = locked;
        setting.updated_by = Some(ctx.user_id);
        setting.updated_at = Utc::now();
        let saved = self.repo.upsert(&setting).await.map_err(internal)?;

        tracing::info!(key, locked, user_id = %ctx.user_id, "setting lock changed");
        self.publish(SettingsEvent::locked(key, locked, ctx.user_id)).await;
        Ok(saved)
    }

    pub async fn delete_setting(&self, ctx: &SecurityCtx, key: &str) -> Result<(), SettingsError> {
        require_admin(ctx)?;
        validate_key(key)?;

        let setting = self
            .repo
            .find(key)
            .await
            .map_err(internal)?
            .ok_or_else(|| SettingsError::not_found(key))?;
        if setting.locked {
            return Err(SettingsError::locked(key));
        }

        if !self.repo.delete(key).await.map_err(internal)? {
            return Err(SettingsError::not_found(key));
        }

        tracing::info!(key, user_id = %ctx.user_id, "setting deleted");
        self.publish(SettingsEvent::deleted(key, ctx.user_id)).await;
        Ok(())
    }

    /// Create configured settings that do not exist yet; returns how many were created
    pub async fn seed_defaults(&self) -> Result<usize, SettingsError> {
        let mut created = 0;
        for seed in &self.config.seed {
            if self.seed_one(seed).await? {
                created += 1;
            }
        }
        if created > 0 {
            tracing::info!(created, "seeded default settings");
        }
        Ok(created)
    }

    // ===== Helpers =====

    async fn seed_one(&self, seed: &SeedSetting) -> Result<bool, SettingsError> {
        validate_key(&seed.key)?;
        if self.repo.find(&seed.key).await.map_err(internal)?.is_some() {
            return Ok(false);
        }
        if let Some(schema) = &seed.schema {
            validate_against_schema(&seed.value, schema)?;
        }

        let now = Utc::now();
        self.repo
            .upsert(&SystemSetting {
                key: seed.key.clone(),
                value: seed.value.clone(),
                description: seed.description.clone(),
                schema: seed.schema.clone(),
                is_public: seed.is_public,
                locked: false,
                updated_by: None,
                created_at: now,
                updated_at: now,
            })
            .await
            .map_err(internal)?;
        Ok(true)
    }

    fn check_size(&self, value: &serde_json::Value) -> Result<(), SettingsError> {
        let size = serde_json::to_vec(value).map_err(|e| internal(e.into()))?.len();
        if size > self.config.max_value_bytes {
            return Err(SettingsError::validation(format!(
                "setting value is {} bytes; the limit is {}",
                size, self.config.max_value_bytes
            )));
        }
        Ok(())
    }

    async fn publish(&self, event: SettingsEvent) {
        let name = event.name();
        if let Err(e) = self.event_publisher.publish(event).await {
            tracing::warn!(event = name, error = %e, "failed to publish settings event");
        }
    }
}

fn require_admin(ctx: &SecurityCtx) -> Result<(), SettingsError> {
    if ctx.is_admin() {
        Ok(())
    } else {
        Err(SettingsError::forbidden("only administrators can change system settings"))
    }
}
