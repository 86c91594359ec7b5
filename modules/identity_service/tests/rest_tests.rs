//! REST router tests driven through `tower::ServiceExt::oneshot`

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    middleware, Router,
};
use brainforge_kit::{db, require_auth, DbModule, RestModule};
use identity_service::domain::NoOpIdentityEventPublisher;
use identity_service::IdentityModule;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

mod common;
use common::{print_test_header, token_service};

async fn app() -> Router {
    let db = Arc::new(db::connect_in_memory().await.expect("sqlite connect failed"));
    let tokens = token_service();
    let module = IdentityModule::new(
        Default::default(),
        db.clone(),
        tokens.clone(),
        Arc::new(NoOpIdentityEventPublisher),
    );
    module.migrate(&db).await.expect("migrations failed");

    let protected = module
        .register_rest(Router::new())
        .expect("routes failed")
        .layer(middleware::from_fn_with_state(tokens, require_auth));
    module
        .register_public_rest(Router::new())
        .expect("public routes failed")
        .merge(protected)
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

async fn register(app: &Router, email: &str) -> String {
    let (status, body) = call(
        app,
        Method::POST,
        "/auth/register",
        None,
        Some(json!({"email": email, "password": "correct horse battery", "display_name": "Tester"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register body: {}", body);
    body["token"].as_str().expect("token missing").to_string()
}

#[tokio::test]
async fn test_register_login_and_me() {
    let app = app().await;

    print_test_header(
        "test_register_login_and_me",
        &["Public auth routes issue tokens that unlock the protected routes."],
    );

    let token = register(&app, "ada@example.com").await;

    let (status, body) = call(
        &app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({"email": "ada@example.com", "password": "correct horse battery"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["role"], "admin");

    let (status, body) = call(&app, Method::GET, "/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "ada@example.com");

    let (status, body) = call(&app, Method::GET, "/auth/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["status"], 401);
}

#[tokio::test]
async fn test_bad_login_is_problem_401() {
    let app = app().await;
    register(&app, "ada@example.com").await;

    let (status, body) = call(
        &app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({"email": "ada@example.com", "password": "nope nope nope"})),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["type"], "https://httpstatuses.io/401");
    assert_eq!(body["detail"], "invalid email or password");
}

#[tokio::test]
async fn test_team_lifecycle_over_http() {
    let app = app().await;
    let owner = register(&app, "owner@example.com").await;
    let dev = register(&app, "dev@example.com").await;

    print_test_header(
        "test_team_lifecycle_over_http",
        &["Create a team, invite and accept, list members, delete."],
    );

    let (status, team) = call(
        &app,
        Method::POST,
        "/teams",
        Some(&owner),
        Some(json!({"name": "Core", "description": "platform team"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(team["my_role"], "owner");
    let team_id = team["id"].as_str().expect("id missing").to_string();

    let (status, _) = call(&app, Method::GET, &format!("/teams/{}", team_id), Some(&dev), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, invitation) = call(
        &app,
        Method::POST,
        &format!("/teams/{}/invitations", team_id),
        Some(&owner),
        Some(json!({"email": "dev@example.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(invitation["role"], "member");
    let token = invitation["token"].as_str().expect("token missing").to_string();

    let (status, mine) = call(&app, Method::GET, "/invitations", Some(&dev), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(mine.as_array().map(Vec::len), Some(1));

    let (status, joined) = call(
        &app,
        Method::POST,
        &format!("/invitations/{}/accept", token),
        Some(&dev),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(joined["my_role"], "member");

    let (status, members) = call(
        &app,
        Method::GET,
        &format!("/teams/{}/members", team_id),
        Some(&dev),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(members.as_array().map(Vec::len), Some(2));

    let (status, problem) = call(
        &app,
        Method::PUT,
        &format!("/teams/{}/members/{}", team_id, uuid::Uuid::new_v4()),
        Some(&owner),
        Some(json!({"role": "overlord"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(problem["title"], "Validation Error");

    let (status, _) = call(&app, Method::DELETE, &format!("/teams/{}", team_id), Some(&dev), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = call(&app, Method::DELETE, &format!("/teams/{}", team_id), Some(&owner), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = call(&app, Method::GET, &format!("/teams/{}", team_id), Some(&owner), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_routes_reject_members() {
    let app = app().await;
    let admin = register(&app, "root@example.com").await;
    let member = register(&app, "member@example.com").await;

    let (status, _) = call(&app, Method::GET, "/users", Some(&member), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, page) = call(&app, Method::GET, "/users?limit=1", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], 2);
    assert_eq!(page["limit"], 1);
    assert_eq!(page["items"].as_array().map(Vec::len), Some(1));
}
