//! Settings service behavior against in-memory mocks

use serde_json::json;
use settings_service::config::{Config, SeedSetting};
use settings_service::domain::SettingsEvent;
use settings_service::{SettingUpdate, SettingsError};

mod common;
use common::{admin, create_test_service, create_test_service_with, member, print_test_header};

fn value(v: serde_json::Value) -> SettingUpdate {
    SettingUpdate {
        value: v,
        ..Default::default()
    }
}

#[tokio::test]
async fn test_upsert_create_then_update_keeps_metadata() {
    let env = create_test_service();
    let admin = admin();

    print_test_header(
        "test_upsert_create_then_update_keeps_metadata",
        &[
            "The first write creates the setting; later writes replace the value",
            "and keep description, visibility and created_at unless given.",
        ],
    );

    println!("\n📝 Stage 1: Create");
    let created = env
        .service
        .upsert_setting(
            &admin,
            "ai.default_provider",
            SettingUpdate {
                value: json!("claude"),
                description: Some("Provider used when a request names none".to_string()),
                schema: None,
                is_public: Some(true),
            },
        )
        .await
        .expect("create failed");
    assert!(created.is_public);
    assert!(!created.locked);
    assert_eq!(created.updated_by, Some(admin.user_id));

    println!("\n📝 Stage 2: Update value only");
    let updated = env
        .service
        .upsert_setting(&admin, "ai.default_provider", value(json!("openai")))
        .await
        .expect("update failed");
    assert_eq!(updated.value, json!("openai"));
    assert_eq!(updated.description, created.description);
    assert!(updated.is_public);
    assert_eq!(updated.created_at, created.created_at);

    println!("\n📝 Stage 3: Events");
    let events = env.events.events();
    assert_eq!(events.len(), 2);
    assert!(matches!(events[0], SettingsEvent::SettingUpserted { is_new: true, .. }));
    assert!(matches!(events[1], SettingsEvent::SettingUpserted { is_new: false, .. }));
}

#[tokio::test]
async fn test_visibility_for_members() {
    let env = create_test_service();
    let admin = admin();
    let member = member();

    print_test_header(
        "test_visibility_for_members",
        &["Members list and read only public settings; hidden ones look missing."],
    );

    env.service
        .upsert_setting(&admin, "ui.theme", SettingUpdate { is_public: Some(true), ..value(json!("dark")) })
        .await
        .expect("upsert failed");
    env.service
        .upsert_setting(&admin, "ai.budget_usd", value(json!(250)))
        .await
        .expect("upsert failed");

    let all = env.service.list_settings(&admin).await.expect("list failed");
    let keys: Vec<&str> = all.iter().map(|s| s.key.as_str()).collect();
    assert_eq!(keys, vec!["ai.budget_usd", "ui.theme"]);

    let visible = env.service.list_settings(&member).await.expect("list failed");
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].key, "ui.theme");

    env.service.get_setting(&member, "ui.theme").await.expect("public read failed");
    let err = env
        .service
        .get_setting(&member, "ai.budget_usd")
        .await
        .expect_err("hidden from members");
    assert!(matches!(err, SettingsError::NotFound { .. }));
    env.service.get_setting(&admin, "ai.budget_usd").await.expect("admin read failed");
}

#[tokio::test]
async fn test_writes_are_admin_only() {
    let env = create_test_service();
    let member = member();

    let err = env
        .service
        .upsert_setting(&member, "ui.theme", value(json!("dark")))
        .await
        .expect_err("members cannot write");
    assert!(matches!(err, SettingsError::Forbidden { .. }));

    let err = env.service.lock_setting(&member, "ui.theme", true).await.expect_err("members cannot lock");
    assert!(matches!(err, SettingsError::Forbidden { .. }));

    let err = env.service.delete_setting(&member, "ui.theme").await.expect_err("members cannot delete");
    assert!(matches!(err, SettingsError::Forbidden { .. }));
    assert_eq!(env.repo.len(), 0);
}

#[tokio::test]
async fn test_key_format_is_enforced() {
    let env = create_test_service();
    let admin = admin();

    for key in ["UI.Theme", "ui..theme", "ui-theme", ""] {
        let err = env
            .service
            .upsert_setting(&admin, key, value(json!(1)))
            .await
            .expect_err("bad key accepted");
        assert!(matches!(err, SettingsError::Validation { .. }), "key {:?}", key);
    }
}

#[tokio::test]
async fn test_schema_validation_uses_new_or_stored_schema() {
    let env = create_test_service();
    let admin = admin();
    let schema = json!({"type": "integer", "minimum": 1, "maximum": 500});

    print_test_header(
        "test_schema_validation_uses_new_or_stored_schema",
        &[
            "A schema sent with the value is enforced and stored;",
            "later writes without a schema are checked against the stored one.",
        ],
    );

    println!("\n📝 Stage 1: Value violating the supplied schema");
    let err = env
        .service
        .upsert_setting(
            &admin,
            "features.brainstorm.max_ideas",
            SettingUpdate {
                schema: Some(schema.clone()),
                ..value(json!(0))
            },
        )
        .await
        .expect_err("schema should reject 0");
    assert!(matches!(err, SettingsError::SchemaValidation { .. }));
    assert_eq!(env.repo.len(), 0);

    println!("\n📝 Stage 2: Valid value stores the schema");
    let saved = env
        .service
        .upsert_setting(
            &admin,
            "features.brainstorm.max_ideas",
            SettingUpdate {
                schema: Some(schema.clone()),
                ..value(json!(200))
            },
        )
        .await
        .expect("valid value rejected");
    assert_eq!(saved.schema, Some(schema));

    println!("\n📝 Stage 3: Stored schema applies to later writes");
    let err = env
        .service
        .upsert_setting(&admin, "features.brainstorm.max_ideas", value(json!("many")))
        .await
        .expect_err("stored schema should reject a string");
    assert!(matches!(err, SettingsError::SchemaValidation { .. }));

    println!("\n📝 Stage 4: A new schema replaces the stored one");
    let saved = env
        .service
        .upsert_setting(
            &admin,
            "features.brainstorm.max_ideas",
            SettingUpdate {
                schema: Some(json!({"type": "string"})),
                ..value(json!("many"))
            },
        )
        .await
        .expect("new schema should allow a string");
    assert_eq!(saved.value, json!("many"));

    println!("\n📝 Stage 5: Broken schemas are rejected outright");
    let err = env
        .service
        .upsert_setting(
            &admin,
            "features.other",
            SettingUpdate {
                schema: Some(json!({"type": 12})),
                ..value(json!(1))
            },
        )
        .await
        .expect_err("invalid schema accepted");
    assert!(matches!(err, SettingsError::Validation { .. }));
}

#[tokio::test]
async fn test_locked_settings_reject_changes() {
    let env = create_test_service();
    let admin = admin();

    print_test_header(
        "test_locked_settings_reject_changes",
        &["Locked settings refuse writes and deletes until unlocked."],
    );

    env.service
        .upsert_setting(&admin, "auth.registration_open", value(json!(true)))
        .await
        .expect("upsert failed");

    let locked = env
        .service
        .lock_setting(&admin, "auth.registration_open", true)
        .await
        .expect("lock failed");
    assert!(locked.locked);

    let err = env
        .service
        .upsert_setting(&admin, "auth.registration_open", value(json!(false)))
        .await
        .expect_err("locked write accepted");
    assert_eq!(err, SettingsError::locked("auth.registration_open"));
    let err = env
        .service
        .delete_setting(&admin, "auth.registration_open")
        .await
        .expect_err("locked delete accepted");
    assert!(matches!(err, SettingsError::Locked { .. }));

    // Locking twice does not publish again
    env.service
        .lock_setting(&admin, "auth.registration_open", true)
        .await
        .expect("relock failed");

    env.service
        .lock_setting(&admin, "auth.registration_open", false)
        .await
        .expect("unlock failed");
    env.service
        .delete_setting(&admin, "auth.registration_open")
        .await
        .expect("delete after unlock failed");

    assert_eq!(
        env.events.names(),
        vec!["setting_upserted", "setting_locked", "setting_locked", "setting_deleted"]
    );
}

#[tokio::test]
async fn test_missing_settings() {
    let env = create_test_service();
    let admin = admin();

    let err = env.service.get_setting(&admin, "nope").await.expect_err("missing");
    assert_eq!(err, SettingsError::not_found("nope"));
    let err = env.service.lock_setting(&admin, "nope", true).await.expect_err("missing");
    assert!(matches!(err, SettingsError::NotFound { .. }));
    let err = env.service.delete_setting(&admin, "nope").await.expect_err("missing");
    assert!(matches!(err, SettingsError::NotFound { .. }));
}

#[tokio::test]
async fn test_value_size_limit_and_failed_publish() {
    let env = create_test_service_with(Config {
        max_value_bytes: 16,
        ..Config::default()
    });
    let admin = admin();

    let err = env
        .service
        .upsert_setting(&admin, "ui.banner", value(json!("this banner text is far too long")))
        .await
        .expect_err("oversized value accepted");
    assert!(matches!(err, SettingsError::Validation { .. }));

    // A broken event bus does not fail the write
    env.events.fail();
    env.service
        .upsert_setting(&admin, "ui.banner", value(json!("hi")))
        .await
        .expect("write should survive publish failure");
    assert!(env.repo.get("ui.banner").is_some());
}

#[tokio::test]
async fn test_seed_defaults_only_fills_gaps() {
    let env = create_test_service_with(Config {
        seed: vec![
            SeedSetting {
                key: "ui.theme".to_string(),
                value: json!("light"),
                description: None,
                schema: None,
                is_public: true,
            },
            SeedSetting {
                key: "ai.default_provider".to_string(),
                value: json!("claude"),
                description: Some("fallback provider".to_string()),
                schema: Some(json!({"type": "string"})),
                is_public: false,
            },
        ],
        ..Config::default()
    });
    let admin = admin();

    print_test_header(
        "test_seed_defaults_only_fills_gaps",
        &["Seeding creates missing settings and never overwrites an existing one."],
    );

    env.service
        .upsert_setting(&admin, "ui.theme", value(json!("dark")))
        .await
        .expect("upsert failed");

    assert_eq!(env.service.seed_defaults().await.expect("seed failed"), 1);
    assert_eq!(env.repo.get("ui.theme").map(|s| s.value), Some(json!("dark")));
    let seeded = env.repo.get("ai.default_provider").expect("seeded setting missing");
    assert_eq!(seeded.updated_by, None);
    assert_eq!(seeded.schema, Some(json!({"type": "string"})));

    assert_eq!(env.service.seed_defaults().await.expect("reseed failed"), 0);
}
