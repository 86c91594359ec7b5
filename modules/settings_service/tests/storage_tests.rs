//! SeaORM repository against an in-memory SQLite database

use brainforge_kit::{db, DbModule};
use chrono::{Duration, Utc};
use sea_orm::DatabaseConnection;
use serde_json::json;
use settings_service::config::{Config, SeedSetting};
use settings_service::domain::{NoOpSettingsEventPublisher, SettingsRepository};
use settings_service::infra::storage::repositories::SeaOrmSettingsRepository;
use settings_service::{SettingsModule, SystemSetting};
use std::sync::Arc;
use uuid::Uuid;

use settings_service::infra::storage::migrations::Migrator;
use sea_orm_migration::{MigrationName, MigratorTrait};
use std::collections::HashSet;

mod common;
use common::print_test_header;

async fn migrated_db(config: Config) -> (Arc<DatabaseConnection>, SettingsModule) {
    let db = Arc::new(db::connect_in_memory().await.expect("sqlite connect failed"));
    let module = SettingsModule::new(config, db.clone(), Arc::new(NoOpSettingsEventPublisher));
    module.migrate(&db).await.expect("migrations failed");
    (db, module)
}

fn setting(key: &str, is_public: bool) -> SystemSetting {
    let now = Utc::now();
    SystemSetting {
        key: key.to_string(),
        value: json!({"enabled": true, "limits": [1, 2, 3]}),
        description: Some("test".to_string()),
        schema: Some(json!({"type": "object"})),
        is_public,
        locked: false,
        updated_by: Some(Uuid::new_v4()),
        created_at: now,
        updated_at: now,
    }
}

#[tokio::test]
async fn test_migrations_are_idempotent_and_seed_once() {
    print_test_header(
        "test_migrations_are_idempotent_and_seed_once",
        &["Migrating twice is a no-op; seeded settings appear once."],
    );

    let config = Config {
        seed: vec![SeedSetting {
            key: "ui.theme".to_string(),
            value: json!("light"),
            description: None,
            schema: None,
            is_public: true,
        }],
        ..Config::default()
    };
    let (db, module) = migrated_db(config).await;
    module.migrate(&db).await.expect("second migration run failed");

    let repo = SeaOrmSettingsRepository::new(db);
    let all = repo.list(false).await.expect("storage call failed");
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].value, json!("light"));
}

#[tokio::test]
async fn test_upsert_round_trip_and_replace() {
    let (db, _module) = migrated_db(Config::default()).await;
    let repo = SeaOrmSettingsRepository::new(db);

    let original = setting("features.brainstorm", false);
    let saved = repo.upsert(&original).await.expect("storage call failed");
    assert_eq!(saved.value, original.value);
    assert_eq!(saved.schema, original.schema);
    assert_eq!(saved.updated_by, original.updated_by);

    let mut changed = saved.clone();
    changed.value = json!(false);
    changed.locked = true;
    changed.updated_at = saved.updated_at + Duration::seconds(5);
    let replaced = repo.upsert(&changed).await.expect("storage call failed");
    assert_eq!(replaced.value, json!(false));
    assert!(replaced.locked);
    assert_eq!(replaced.created_at.timestamp(), saved.created_at.timestamp());

    assert_eq!(repo.list(false).await.expect("storage call failed").len(), 1);
}

#[tokio::test]
async fn test_list_filters_and_orders_by_key() {
    let (db, _module) = migrated_db(Config::default()).await;
    let repo = SeaOrmSettingsRepository::new(db);

    for (key, public) in [("ui.theme", true), ("ai.budget", false), ("auth.open", true)] {
        repo.upsert(&setting(key, public)).await.expect("storage call failed");
    }

    let all: Vec<String> = repo
        .list(false)
        .await
        .expect("storage call failed")
        .into_iter()
        .map(|s| s.key)
        .collect();
    assert_eq!(all, vec!["ai.budget", "auth.open", "ui.theme"]);

    let public: Vec<String> = repo
        .list(true)
        .await
        .expect("storage call failed")
        .into_iter()
        .map(|s| s.key)
        .collect();
    assert_eq!(public, vec!["auth.open", "ui.theme"]);

    assert!(repo.delete("ai.budget").await.expect("storage call failed"));
    assert!(!repo.delete("ai.budget").await.expect("storage call failed"));
    assert!(repo.find("ai.budget").await.expect("storage call failed").is_none());
}

#[tokio::test]
async fn test_fresh_database_records_each_migration_by_name() {
    print_test_header(
        "test_fresh_database_records_each_migration_by_name",
        &["Every migration lands in the bookkeeping table under its own versioned name."],
    );

    let (db, _module) = migrated_db(Config::default()).await;

    let declared: Vec<String> = Migrator::migrations()
        .iter()
        .map(|m| m.name().to_string())
        .collect();
    let unique: HashSet<&String> = declared.iter().collect();
    assert_eq!(unique.len(), declared.len(), "duplicate migration names: {:?}", declared);
    assert!(declared.iter().all(|name| name.starts_with("m2025")));

    let applied: Vec<String> = Migrator::get_applied_migrations(db.as_ref())
        .await
        .expect("reading applied migrations failed")
        .iter()
        .map(|m| m.name().to_string())
        .collect();
    assert_eq!(applied, declared);
}
