//! Shared fixtures for settings service tests
#![allow(dead_code)]

use anyhow::Result;
use async_trait::async_trait;
use brainforge_kit::{Role, SecurityCtx};
use parking_lot::{Mutex, RwLock};
use settings_service::config::Config;
use settings_service::domain::{Service, SettingsEvent, SettingsEventPublisher, SettingsRepository};
use settings_service::SystemSetting;
use std::collections::BTreeMap;
use std::sync::Arc;
use uuid::Uuid;

pub fn print_test_header(test_name: &str, purpose: &[&str]) {
    println!("\n🧪 TEST: {}", test_name);
    if let Some(first) = purpose.first() {
        println!("📋 PURPOSE: {}", first);
    }
    for line in purpose.iter().skip(1) {
        println!("   {}", line);
    }
}

pub fn admin() -> SecurityCtx {
    let id = Uuid::new_v4();
    SecurityCtx::new(id, format!("{}@example.com", id), Role::Admin)
}

pub fn member() -> SecurityCtx {
    let id = Uuid::new_v4();
    SecurityCtx::new(id, format!("{}@example.com", id), Role::Member)
}

/// In-memory settings table keyed (and ordered) by key
#[derive(Default)]
pub struct MockSettingsRepository {
    rows: RwLock<BTreeMap<String, SystemSetting>>,
}

impl MockSettingsRepository {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn get(&self, key: &str) -> Option<SystemSetting> {
        self.rows.read().get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.rows.read().len()
    }
}

#[async_trait]
impl SettingsRepository for MockSettingsRepository {
    async fn list(&self, public_only: bool) -> Result<Vec<SystemSetting>> {
        Ok(self
            .rows
            .read()
            .values()
            .filter(|s| !public_only || s.is_public)
            .cloned()
            .collect())
    }

    async fn find(&self, key: &str) -> Result<Option<SystemSetting>> {
        Ok(self.get(key))
    }

    async fn upsert(&self, setting: &SystemSetting) -> Result<SystemSetting> {
        self.rows.write().insert(setting.key.clone(), setting.clone());
        Ok(setting.clone())
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        Ok(self.rows.write().remove(key).is_some())
    }
}

#[derive(Default)]
pub struct RecordingPublisher {
    events: Mutex<Vec<SettingsEvent>>,
    fail: Mutex<bool>,
}

impl RecordingPublisher {
    pub fn names(&self) -> Vec<&'static str> {
        self.events.lock().iter().map(|e| e.name()).collect()
    }

    pub fn events(&self) -> Vec<SettingsEvent> {
        self.events.lock().clone()
    }

    pub fn fail(&self) {
        *self.fail.lock() = true;
    }
}

#[async_trait]
impl SettingsEventPublisher for RecordingPublisher {
    async fn publish(&self, event: SettingsEvent) -> Result<()> {
        if *self.fail.lock() {
            anyhow::bail!("event bus unavailable");
        }
        self.events.lock().push(event);
        Ok(())
    }
}

pub struct TestEnv {
    pub service: Service,
    pub repo: Arc<MockSettingsRepository>,
    pub events: Arc<RecordingPublisher>,
}

pub fn create_test_service() -> TestEnv {
    create_test_service_with(Config::default())
}

pub fn create_test_service_with(config: Config) -> TestEnv {
    let repo = MockSettingsRepository::new();
    let events = Arc::new(RecordingPublisher::default());
    let service = Service::new(repo.clone(), events.clone(), config);
    TestEnv { service, repo, events }
}
