//! Domain service tests against scripted providers and an in-memory store

use ai_gateway::contract::*;
use ai_gateway::domain::ProviderError;
use brainforge_kit::PageQuery;
use chrono::{Duration, Utc};
use uuid::Uuid;

mod common;
use common::{admin, completion, create_test_service, member, print_test_header};

fn new_key(provider: ProviderKind, api_key: &str) -> NewAiKey {
    NewAiKey {
        provider,
        api_key: api_key.to_string(),
        label: None,
        endpoint: None,
        validate: false,
    }
}

fn ask(text: &str) -> ChatRequest {
    ChatRequest {
        messages: vec![ChatMessage::user(text)],
        ..Default::default()
    }
}

#[tokio::test]
async fn test_saved_keys_are_encrypted_and_first_becomes_default() {
    print_test_header(
        "test_saved_keys_are_encrypted_and_first_becomes_default",
        &[
            "The stored key is ciphertext, metadata carries only a hint,",
            "and only the first key a user saves becomes the default.",
        ],
    );

    let env = create_test_service();
    let ctx = member();

    println!("\n📝 Stage 1: Save an OpenAI key");
    let saved = env
        .service
        .save_key(&ctx, new_key(ProviderKind::OpenAi, "sk-test-abcd1234"))
        .await
        .expect("save failed");
    assert_eq!(saved.key_hint, "1234");
    assert!(saved.is_default);
    assert!(saved.is_active);
    assert!(saved.last_validated_at.is_none());

    let stored = env.store.stored(ctx.user_id, ProviderKind::OpenAi).expect("key missing");
    assert!(stored.encrypted_key.starts_with("v1:"));
    assert!(!stored.encrypted_key.contains("sk-test-abcd1234"));

    println!("\n📝 Stage 2: A second key is not the default");
    let claude = env
        .service
        .save_key(&ctx, new_key(ProviderKind::Claude, "sk-ant-zzzz9999"))
        .await
        .expect("save failed");
    assert!(!claude.is_default);

    println!("\n📝 Stage 3: Switch the default");
    let switched = env
        .service
        .set_default_provider(&ctx, ProviderKind::Claude)
        .await
        .expect("set default failed");
    assert!(switched.is_default);

    let keys = env.service.list_keys(&ctx).await.expect("list failed");
    let defaults: Vec<ProviderKind> = keys.iter().filter(|k| k.is_default).map(|k| k.provider).collect();
    assert_eq!(defaults, vec![ProviderKind::Claude]);
    env.store.print_state("after default switch");
}

#[tokio::test]
async fn test_replacing_a_key_keeps_identity_and_default() {
    let env = create_test_service();
    let ctx = member();

    let first = env
        .service
        .save_key(&ctx, new_key(ProviderKind::Groq, "gsk-first-1111"))
        .await
        .expect("save failed");
    let second = env
        .service
        .save_key(&ctx, new_key(ProviderKind::Groq, "gsk-second-2222"))
        .await
        .expect("replace failed");

    assert_eq!(first.id, second.id);
    assert!(second.is_default);
    assert_eq!(second.key_hint, "2222");
    assert_eq!(env.service.list_keys(&ctx).await.expect("list failed").len(), 1);

    // The new material is what reaches the provider
    env.service
        .chat(ctx.user_id, "chat", Some(ProviderKind::Groq), ask("hi"))
        .await
        .expect("chat failed");
    let used = env.provider(ProviderKind::Groq).credentials();
    assert_eq!(used[0].api_key, "gsk-second-2222");
}

#[tokio::test]
async fn test_validation_on_save() {
    print_test_header(
        "test_validation_on_save",
        &["A key the provider rejects is not stored; an accepted key is stamped."],
    );

    let env = create_test_service();
    let ctx = member();
    let openai = env.provider(ProviderKind::OpenAi);

    openai.set_validation(Err(ProviderError::Unauthorized {
        message: "Incorrect API key provided".to_string(),
    }));
    let mut input = new_key(ProviderKind::OpenAi, "sk-bad-0000");
    input.validate = true;
    let err = env.service.save_key(&ctx, input.clone()).await.expect_err("bad key accepted");
    assert!(matches!(err, AiGatewayError::KeyInvalid { provider: ProviderKind::OpenAi, .. }));
    assert!(env.store.stored(ctx.user_id, ProviderKind::OpenAi).is_none());

    openai.set_validation(Err(ProviderError::RateLimited));
    let err = env.service.save_key(&ctx, input.clone()).await.expect_err("rate limit ignored");
    assert!(matches!(err, AiGatewayError::RateLimited { .. }));

    openai.set_validation(Ok(()));
    let saved = env.service.save_key(&ctx, input).await.expect("good key rejected");
    assert!(saved.last_validated_at.is_some());
    assert_eq!(openai.credentials().last().map(|c| c.api_key.as_str()), Some("sk-bad-0000"));
}

#[tokio::test]
async fn test_key_input_rules() {
    let env = create_test_service();
    let ctx = member();

    let blank = env.service.save_key(&ctx, new_key(ProviderKind::OpenAi, "   ")).await;
    assert!(matches!(blank, Err(AiGatewayError::Validation { .. })));

    let spaced = env.service.save_key(&ctx, new_key(ProviderKind::OpenAi, "sk with space")).await;
    assert!(matches!(spaced, Err(AiGatewayError::Validation { .. })));

    // Only Copilot takes an endpoint, and it must have one
    let mut stray = new_key(ProviderKind::OpenAi, "sk-endpoint-1234");
    stray.endpoint = Some("https://example.openai.azure.com".to_string());
    assert!(matches!(
        env.service.save_key(&ctx, stray).await,
        Err(AiGatewayError::Validation { .. })
    ));

    let missing = env.service.save_key(&ctx, new_key(ProviderKind::Copilot, "azure-key-5678")).await;
    assert!(matches!(missing, Err(AiGatewayError::Validation { .. })));

    let mut copilot = new_key(ProviderKind::Copilot, "azure-key-5678");
    copilot.endpoint = Some("https://team.openai.azure.com/".to_string());
    let saved = env.service.save_key(&ctx, copilot).await.expect("copilot save failed");
    assert_eq!(saved.endpoint.as_deref(), Some("https://team.openai.azure.com"));

    env.service
        .chat(ctx.user_id, "chat", Some(ProviderKind::Copilot), ask("hello"))
        .await
        .expect("chat failed");
    let used = env.provider(ProviderKind::Copilot).credentials();
    assert_eq!(used[0].endpoint.as_deref(), Some("https://team.openai.azure.com"));
}

#[tokio::test]
async fn test_chat_uses_the_users_default_key_and_meters_cost() {
    print_test_header(
        "test_chat_uses_the_users_default_key_and_meters_cost",
        &[
            "Without an explicit provider the user's default key is used,",
            "and the usage row records tokens, cost and the key source.",
        ],
    );

    let env = create_test_service();
    let ctx = member();
    env.service
        .save_key(&ctx, new_key(ProviderKind::Claude, "sk-ant-user-4321"))
        .await
        .expect("save failed");

    let claude = env.provider(ProviderKind::Claude);
    claude.reply(Ok(completion(ProviderKind::Claude, "claude-3-5-sonnet-20241022", 1000, 500)));

    let mut request = ask("Summarize the sprint");
    request.model = Some("claude-3-5-sonnet-20241022".to_string());
    let reply = env
        .service
        .chat(ctx.user_id, "sprint_summary", None, request)
        .await
        .expect("chat failed");
    assert_eq!(reply.provider, ProviderKind::Claude);
    assert_eq!(claude.credentials()[0].api_key, "sk-ant-user-4321");

    let rows = env.store.usage_rows();
    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert!(row.success);
    assert_eq!(row.feature, "sprint_summary");
    assert_eq!(row.key_source, KeySource::User);
    assert_eq!(row.input_tokens, 1000);
    assert_eq!(row.output_tokens, 500);
    // 1000 * 3.00 + 500 * 15.00 micro-dollars
    assert_eq!(row.cost_micros, 10_500);
}

#[tokio::test]
async fn test_chat_falls_back_to_system_key_and_default_model() {
    let env = create_test_service();
    let ctx = member();

    env.service
        .chat(ctx.user_id, "chat", Some(ProviderKind::Groq), ask("hi"))
        .await
        .expect("chat failed");

    let groq = env.provider(ProviderKind::Groq);
    assert_eq!(groq.credentials()[0].api_key, "sys-groq-key");
    assert_eq!(groq.requests()[0].model.as_deref(), Some("llama-3.1-8b-instant"));

    let rows = env.store.usage_rows();
    assert_eq!(rows[0].key_source, KeySource::System);
    assert_eq!(rows[0].model, "llama-3.1-8b-instant");
}

#[tokio::test]
async fn test_chat_without_any_key_is_rejected_before_the_provider() {
    let env = create_test_service();
    let ctx = member();

    let err = env
        .service
        .chat(ctx.user_id, "chat", Some(ProviderKind::Claude), ask("hi"))
        .await
        .expect_err("chat without key succeeded");
    assert!(matches!(err, AiGatewayError::NoKeyConfigured { provider: ProviderKind::Claude }));
    assert_eq!(env.provider(ProviderKind::Claude).calls(), 0);
    assert!(env.store.usage_rows().is_empty());
}

#[tokio::test]
async fn test_rejected_user_key_is_deactivated_without_system_fallback() {
    print_test_header(
        "test_rejected_user_key_is_deactivated_without_system_fallback",
        &[
            "A 401 on a user key deactivates it and records a failed usage row.",
            "Later calls fail fast even though a system key exists.",
        ],
    );

    let env = create_test_service();
    let ctx = member();
    let openai = env.provider(ProviderKind::OpenAi);
    env.service
        .save_key(&ctx, new_key(ProviderKind::OpenAi, "sk-revoked-7777"))
        .await
        .expect("save failed");

    println!("\n📝 Stage 1: Provider rejects the key");
    openai.reply(Err(ProviderError::Unauthorized {
        message: "invalid_api_key".to_string(),
    }));
    let err = env
        .service
        .chat(ctx.user_id, "chat", Some(ProviderKind::OpenAi), ask("hi"))
        .await
        .expect_err("rejected key succeeded");
    assert!(matches!(err, AiGatewayError::KeyInvalid { .. }));

    let stored = env.store.stored(ctx.user_id, ProviderKind::OpenAi).expect("key missing");
    assert!(!stored.key.is_active);
    assert_eq!(stored.key.last_error.as_deref(), Some("invalid_api_key"));

    let rows = env.store.usage_rows();
    assert_eq!(rows.len(), 1);
    assert!(!rows[0].success);
    assert_eq!(rows[0].input_tokens, 0);
    assert_eq!(rows[0].cost_micros, 0);

    println!("\n📝 Stage 2: Next call fails without reaching the provider");
    let err = env
        .service
        .chat(ctx.user_id, "chat", Some(ProviderKind::OpenAi), ask("again"))
        .await
        .expect_err("inactive key used");
    assert!(matches!(err, AiGatewayError::KeyInvalid { .. }));
    assert_eq!(openai.calls(), 1);

    println!("\n📝 Stage 3: The inactive key cannot become default");
    let err = env
        .service
        .set_default_provider(&ctx, ProviderKind::OpenAi)
        .await
        .expect_err("inactive default accepted");
    assert!(matches!(err, AiGatewayError::Validation { .. }));

    println!("\n📝 Stage 4: Revalidation reactivates it");
    let key = env
        .service
        .validate_key(&ctx, ProviderKind::OpenAi)
        .await
        .expect("validate failed");
    assert!(key.is_active);
    assert!(key.last_error.is_none());
    assert!(key.last_validated_at.is_some());
    env.store.print_state("after revalidation");
}

#[tokio::test]
async fn test_validate_key_reports_rejection_in_metadata() {
    let env = create_test_service();
    let ctx = member();
    env.service
        .save_key(&ctx, new_key(ProviderKind::Gemini, "AIza-old-3333"))
        .await
        .expect("save failed");

    env.provider(ProviderKind::Gemini).set_validation(Err(ProviderError::Unauthorized {
        message: "API key not valid".to_string(),
    }));
    let key = env
        .service
        .validate_key(&ctx, ProviderKind::Gemini)
        .await
        .expect("validation call failed");
    assert!(!key.is_active);
    assert_eq!(key.last_error.as_deref(), Some("API key not valid"));

    let err = env.service.validate_key(&ctx, ProviderKind::Claude).await;
    assert!(matches!(err, Err(AiGatewayError::NotFound { .. })));
}

#[tokio::test]
async fn test_system_key_rejection_and_rate_limits() {
    let env = create_test_service();
    let ctx = member();
    let groq = env.provider(ProviderKind::Groq);

    groq.reply(Err(ProviderError::Unauthorized {
        message: "bad key".to_string(),
    }));
    let err = env
        .service
        .chat(ctx.user_id, "chat", Some(ProviderKind::Groq), ask("hi"))
        .await
        .expect_err("rejected system key succeeded");
    assert!(matches!(err, AiGatewayError::ProviderUnavailable { .. }));

    groq.reply(Err(ProviderError::RateLimited));
    let err = env
        .service
        .chat(ctx.user_id, "chat", Some(ProviderKind::Groq), ask("hi"))
        .await
        .expect_err("rate limit ignored");
    assert!(matches!(err, AiGatewayError::RateLimited { provider: ProviderKind::Groq }));

    groq.reply(Err(ProviderError::Upstream {
        status: 500,
        message: "boom".to_string(),
    }));
    let err = env
        .service
        .chat(ctx.user_id, "chat", Some(ProviderKind::Groq), ask("hi"))
        .await
        .expect_err("upstream failure ignored");
    assert!(matches!(err, AiGatewayError::ProviderUnavailable { .. }));

    let rows = env.store.usage_rows();
    assert_eq!(rows.len(), 3);
    assert!(rows.iter().all(|r| !r.success && r.error.is_some()));
}

#[tokio::test]
async fn test_chat_request_rules() {
    let env = create_test_service();
    let ctx = member();

    let empty = env
        .service
        .chat(ctx.user_id, "chat", None, ChatRequest::default())
        .await;
    assert!(matches!(empty, Err(AiGatewayError::Validation { .. })));

    let mut hot = ask("hi");
    hot.temperature = Some(3.5);
    let err = env.service.chat(ctx.user_id, "chat", None, hot).await;
    assert!(matches!(err, Err(AiGatewayError::Validation { .. })));

    let bad_feature = env.service.chat(ctx.user_id, "no spaces!", None, ask("hi")).await;
    assert!(matches!(bad_feature, Err(AiGatewayError::Validation { .. })));

    assert_eq!(env.provider(ProviderKind::OpenAi).calls(), 0);
}

#[tokio::test]
async fn test_usage_listing_and_summaries() {
    print_test_header(
        "test_usage_listing_and_summaries",
        &["Pages are newest first; summaries split by model and feature."],
    );

    let env = create_test_service();
    let ctx = member();
    let other = member();
    let now = Utc::now();

    let row = |user_id: Uuid, model: &str, feature: &str, cost: i64, success: bool, age: i64| UsageRecord {
        id: Uuid::new_v4(),
        user_id,
        provider: ProviderKind::OpenAi,
        model: model.to_string(),
        feature: feature.to_string(),
        input_tokens: 100,
        output_tokens: 50,
        cost_micros: cost,
        key_source: KeySource::System,
        success,
        error: None,
        latency_ms: 20,
        created_at: now - Duration::minutes(age),
    };
    env.store.push_usage(row(ctx.user_id, "gpt-4o", "chat", 500, true, 30));
    env.store.push_usage(row(ctx.user_id, "gpt-4o-mini", "brainstorm", 40, true, 20));
    env.store.push_usage(row(ctx.user_id, "gpt-4o", "brainstorm", 0, false, 10));
    env.store.push_usage(row(other.user_id, "gpt-4o", "chat", 900, true, 5));

    println!("\n📝 Stage 1: Paged listing");
    let page = env
        .service
        .list_usage(&ctx, PageQuery::new(2, 0))
        .await
        .expect("list failed");
    assert_eq!(page.total, 3);
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[0].feature, "brainstorm");
    assert!(!page.items[0].success);

    println!("\n📝 Stage 2: Caller summary");
    let summary = env.service.usage_summary(&ctx, None, None).await.expect("summary failed");
    assert_eq!(summary.totals.requests, 3);
    assert_eq!(summary.totals.failures, 1);
    assert_eq!(summary.totals.cost_micros, 540);
    assert_eq!(summary.by_model[0].model, "gpt-4o");
    assert_eq!(summary.by_model[0].totals.requests, 2);
    assert_eq!(summary.by_feature.len(), 2);

    println!("\n📝 Stage 3: Range filter");
    let recent = env
        .service
        .usage_summary(&ctx, Some(now - Duration::minutes(25)), None)
        .await
        .expect("summary failed");
    assert_eq!(recent.totals.requests, 2);

    let inverted = env
        .service
        .usage_summary(&ctx, Some(now), Some(now - Duration::hours(1)))
        .await;
    assert!(matches!(inverted, Err(AiGatewayError::Validation { .. })));

    println!("\n📝 Stage 4: Global summary is admin-only");
    let denied = env.service.global_usage_summary(&ctx, None, None).await;
    assert!(matches!(denied, Err(AiGatewayError::Forbidden { .. })));

    let global = env
        .service
        .global_usage_summary(&admin(), None, None)
        .await
        .expect("global summary failed");
    assert_eq!(global.totals.requests, 4);
    assert_eq!(global.totals.cost_micros, 1_440);
}

#[tokio::test]
async fn test_provider_listing_flags() {
    let env = create_test_service();
    let ctx = member();
    env.service
        .save_key(&ctx, new_key(ProviderKind::Gemini, "AIza-user-8888"))
        .await
        .expect("save failed");

    let providers = env.service.list_providers(&ctx).await.expect("list failed");
    assert_eq!(providers.len(), ProviderKind::ALL.len());

    let gemini = providers
        .iter()
        .find(|p| p.provider == ProviderKind::Gemini)
        .expect("gemini missing");
    assert!(gemini.has_user_key);
    assert!(gemini.is_default);
    assert!(!gemini.has_system_key);

    let groq = providers
        .iter()
        .find(|p| p.provider == ProviderKind::Groq)
        .expect("groq missing");
    assert!(groq.has_system_key);
    assert!(!groq.has_user_key);
    assert!(!groq.is_default);
}

#[tokio::test]
async fn test_delete_key() {
    let env = create_test_service();
    let ctx = member();
    env.service
        .save_key(&ctx, new_key(ProviderKind::OpenRouter, "sk-or-6666"))
        .await
        .expect("save failed");

    env.service
        .delete_key(&ctx, ProviderKind::OpenRouter)
        .await
        .expect("delete failed");
    let again = env.service.delete_key(&ctx, ProviderKind::OpenRouter).await;
    assert!(matches!(again, Err(AiGatewayError::NotFound { .. })));
}
