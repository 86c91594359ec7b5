//! REST router tests driven through `tower::ServiceExt::oneshot`

use ai_gateway::config::Config;
use ai_gateway::AiGatewayModule;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    middleware, Router,
};
use brainforge_kit::{db, require_auth, DbModule, RestModule, Role, TokenService};
use httpmock::prelude::*;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;
use uuid::Uuid;

mod common;
use common::{print_test_header, TEST_SECRET};

struct TestApp {
    router: Router,
    tokens: Arc<TokenService>,
}

impl TestApp {
    fn token(&self, user_id: Uuid, role: Role) -> String {
        self.tokens
            .issue(user_id, &format!("{}@example.com", user_id), role)
            .expect("token issue failed")
            .token
    }
}

/// Gateway whose OpenAI adapter talks to `server`
async fn app(server: &MockServer) -> TestApp {
    let db = Arc::new(db::connect_in_memory().await.expect("sqlite connect failed"));
    let tokens = Arc::new(TokenService::new(
        "gateway-test-jwt",
        "brainforge-test",
        Duration::from_secs(3600),
    ));

    let mut config = Config {
        encryption_secret: TEST_SECRET.to_string(),
        ..Config::default()
    };
    config.providers.openai.base_url = Some(server.base_url());

    let module = AiGatewayModule::new(config, db.clone()).expect("module init failed");
    module.migrate(&db).await.expect("migrations failed");

    let router = module
        .register_rest(Router::new())
        .expect("routes failed")
        .layer(middleware::from_fn_with_state(tokens.clone(), require_auth));

    TestApp { router, tokens }
}

async fn call(app: &Router, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request build failed"),
        None => builder.body(Body::empty()).expect("request build failed"),
    };

    let response = app.clone().oneshot(request).await.expect("request failed");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body read failed");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

#[tokio::test]
async fn test_requests_without_token_are_rejected() {
    let server = MockServer::start_async().await;
    let app = app(&server).await;

    let (status, body) = call(&app.router, Method::GET, "/ai/providers", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["status"], 401);
}

#[tokio::test]
async fn test_key_chat_and_usage_flow_over_http() {
    print_test_header(
        "test_key_chat_and_usage_flow_over_http",
        &[
            "Save a validated key, chat through it and read the metered usage.",
            "Removing the key leaves the user without any credential.",
        ],
    );

    let server = MockServer::start_async().await;
    let models = server
        .mock_async(|when, then| {
            when.method(GET).path("/models").header("authorization", "Bearer sk-http-test-9876");
            then.status(200).json_body(json!({"object": "list", "data": []}));
        })
        .await;
    let completions = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/chat/completions")
                .header("authorization", "Bearer sk-http-test-9876");
            then.status(200).json_body(json!({
                "model": "gpt-4o-mini-2024-07-18",
                "choices": [{"message": {"role": "assistant", "content": "Ship it."}, "finish_reason": "stop"}],
                "usage": {"prompt_tokens": 1000, "completion_tokens": 200}
            }));
        })
        .await;

    let app = app(&server).await;
    let user = Uuid::new_v4();
    let token = app.token(user, Role::Member);
    let r = &app.router;

    println!("\n📝 Stage 1: Save and validate a key");
    let (status, key) = call(
        r,
        Method::PUT,
        "/ai/keys/openai",
        Some(&token),
        Some(json!({"api_key": "sk-http-test-9876", "label": "work"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "body: {}", key);
    models.assert_async().await;
    assert_eq!(key["key_hint"], "9876");
    assert_eq!(key["is_default"], true);
    assert!(key["last_validated_at"].is_string());
    assert!(key.get("api_key").is_none());

    let (status, providers) = call(r, Method::GET, "/ai/providers", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let openai = providers
        .as_array()
        .expect("providers missing")
        .iter()
        .find(|p| p["provider"] == "openai")
        .expect("openai missing")
        .clone();
    assert_eq!(openai["has_user_key"], true);

    println!("\n📝 Stage 2: Chat");
    let (status, reply) = call(
        r,
        Method::POST,
        "/ai/chat",
        Some(&token),
        Some(json!({"feature": "brainstorm", "messages": [{"role": "user", "content": "Ready?"}]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "body: {}", reply);
    completions.assert_async().await;
    assert_eq!(reply["content"], "Ship it.");
    assert_eq!(reply["usage"]["total_tokens"], 1200);

    println!("\n📝 Stage 3: Usage");
    let (status, usage) = call(r, Method::GET, "/ai/usage", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(usage["total"], 1);
    assert_eq!(usage["items"][0]["feature"], "brainstorm");
    assert_eq!(usage["items"][0]["key_source"], "user");

    let (status, summary) = call(r, Method::GET, "/ai/usage/summary", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["totals"]["requests"], 1);
    // 1000 * 0.15 + 200 * 0.60 micro-dollars
    assert_eq!(summary["totals"]["cost_micros"], 270);
    assert_eq!(summary["by_feature"][0]["feature"], "brainstorm");

    println!("\n📝 Stage 4: Delete the key");
    let (status, _) = call(r, Method::DELETE, "/ai/keys/openai", Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = call(
        r,
        Method::POST,
        "/ai/chat",
        Some(&token),
        Some(json!({"messages": [{"role": "user", "content": "Still there?"}]})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
}

#[tokio::test]
async fn test_rejected_key_is_unprocessable() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/models");
            then.status(401)
                .json_body(json!({"error": {"message": "Incorrect API key provided"}}));
        })
        .await;

    let app = app(&server).await;
    let token = app.token(Uuid::new_v4(), Role::Member);

    let (status, body) = call(
        &app.router,
        Method::PUT,
        "/ai/keys/openai",
        Some(&token),
        Some(json!({"api_key": "sk-wrong-0000"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["status"], 422);

    let (_, keys) = call(&app.router, Method::GET, "/ai/keys", Some(&token), None).await;
    assert_eq!(keys.as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn test_bad_inputs_and_admin_routes() {
    let server = MockServer::start_async().await;
    let app = app(&server).await;
    let member = app.token(Uuid::new_v4(), Role::Member);
    let admin = app.token(Uuid::new_v4(), Role::Admin);
    let r = &app.router;

    let (status, _) = call(
        r,
        Method::PUT,
        "/ai/keys/watsonx",
        Some(&member),
        Some(json!({"api_key": "x-1234", "validate": false})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = call(
        r,
        Method::POST,
        "/ai/chat",
        Some(&member),
        Some(json!({"messages": [{"role": "robot", "content": "beep"}]})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = call(r, Method::DELETE, "/ai/keys/claude", Some(&member), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call(r, Method::GET, "/ai/usage/global", Some(&member), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, global) = call(r, Method::GET, "/ai/usage/global", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(global["totals"]["requests"], 0);
}
