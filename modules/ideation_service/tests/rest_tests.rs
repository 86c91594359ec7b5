//! REST router tests driven through `tower::ServiceExt::oneshot`

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    middleware, Router,
};
use brainforge_kit::{db, require_auth, DbModule, RestModule, Role, TokenService};
use identity_service::TeamRole;
use ideation_service::domain::NoOpIdeationEventSink;
use ideation_service::IdeationModule;
use planner_service::TaskPriority;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;
use uuid::Uuid;

mod common;
use common::{backlog_task, print_test_header, MockAi, MockIdentity, MockPlanner};

struct TestApp {
    router: Router,
    tokens: Arc<TokenService>,
    identity: Arc<MockIdentity>,
    planner: Arc<MockPlanner>,
    ai: Arc<MockAi>,
}

impl TestApp {
    fn token(&self, user_id: Uuid) -> String {
        self.tokens
            .issue(user_id, &format!("{}@example.com", user_id), Role::Member)
            .expect("token issue failed")
            .token
    }
}

async fn app() -> TestApp {
    let db = Arc::new(db::connect_in_memory().await.expect("sqlite connect failed"));
    let tokens = Arc::new(TokenService::new(
        "ideation-test-secret",
        "brainforge-test",
        Duration::from_secs(3600),
    ));
    let identity = MockIdentity::new();
    let planner = MockPlanner::new();
    let ai = MockAi::new();
    let module = IdeationModule::new(
        Default::default(),
        db.clone(),
        identity.clone(),
        planner.clone(),
        ai.clone(),
        Arc::new(NoOpIdeationEventSink),
    );
    module.migrate(&db).await.expect("migrations failed");

    let router = module
        .register_rest(Router::new())
        .expect("routes failed")
        .layer(middleware::from_fn_with_state(tokens.clone(), require_auth));

    TestApp {
        router,
        tokens,
        identity,
        planner,
        ai,
    }
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
async fn test_brainstorm_flow_over_http() {
    let app = app().await;
    let (team_id, owner) = app.identity.team();
    let member = app.identity.add_member(team_id, TeamRole::Member);
    let owner_token = app.token(owner);
    let member_token = app.token(member);
    let r = &app.router;

    print_test_header(
        "test_brainstorm_flow_over_http",
        &["Create a session, add and vote on ideas, generate more, convert to tasks."],
    );

    println!("\n📝 Stage 1: Create a session");
    let (status, session) = call(
        r,
        Method::POST,
        &format!("/teams/{}/brainstorms", team_id),
        Some(&member_token),
        Some(json!({"title": "Q3 themes", "topic": "What should we build next?"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "body: {}", session);
    assert_eq!(session["status"], "open");
    let session_id = session["id"].as_str().expect("id missing").to_string();

    println!("\n📝 Stage 2: Add and vote");
    let (status, with_idea) = call(
        r,
        Method::POST,
        &format!("/brainstorms/{}/ideas", session_id),
        Some(&member_token),
        Some(json!({"text": "Offline mode"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(with_idea["ideas"][0]["author_kind"], "user");
    let idea_id = with_idea["ideas"][0]["id"].as_str().expect("id missing").to_string();

    let vote_uri = format!("/brainstorms/{}/ideas/{}/vote", session_id, idea_id);
    let (status, voted) = call(r, Method::POST, &vote_uri, Some(&owner_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(voted["ideas"][0]["votes"], 1);
    let (status, body) = call(r, Method::POST, &vote_uri, Some(&owner_token), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["status"], 409);

    println!("\n📝 Stage 3: Generate ideas with an explicit provider");
    app.ai.reply("- Team templates\n- Offline mode");
    let (status, generated) = call(
        r,
        Method::POST,
        &format!("/brainstorms/{}/generate", session_id),
        Some(&member_token),
        Some(json!({"count": 2, "provider": "gemini"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "body: {}", generated);
    let ideas = generated["ideas"].as_array().expect("ideas missing");
    assert_eq!(ideas.len(), 2);
    assert_eq!(ideas[1]["author_kind"], "ai");
    assert_eq!(ideas[1]["author_id"], Value::Null);

    let (status, _) = call(
        r,
        Method::POST,
        &format!("/brainstorms/{}/generate", session_id),
        Some(&member_token),
        Some(json!({"provider": "skynet"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    println!("\n📝 Stage 4: Summarize and convert");
    app.ai.reply("Focus on offline support.");
    let (status, summarized) = call(
        r,
        Method::POST,
        &format!("/brainstorms/{}/summarize?provider=claude", session_id),
        Some(&member_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summarized["ai_summary"], "Focus on offline support.");

    let (status, tasks) = call(
        r,
        Method::POST,
        &format!("/brainstorms/{}/convert", session_id),
        Some(&member_token),
        Some(json!({"idea_ids": [idea_id]})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "body: {}", tasks);
    assert_eq!(tasks[0]["title"], "Offline mode");
    assert_eq!(tasks[0]["tags"][0], "brainstorm");
    assert_eq!(app.planner.created().len(), 1);

    println!("\n📝 Stage 5: Close, then delete");
    let (status, _) = call(r, Method::POST, &format!("/brainstorms/{}/close", session_id), Some(&owner_token), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = call(r, Method::DELETE, &format!("/brainstorms/{}", session_id), Some(&member_token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = call(r, Method::GET, &format!("/brainstorms/{}", session_id), Some(&member_token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_diagram_routes_over_http() {
    let app = app().await;
    let (team_id, owner) = app.identity.team();
    let token = app.token(owner);
    let r = &app.router;

    let (status, body) = call(
        r,
        Method::POST,
        &format!("/teams/{}/diagrams", team_id),
        Some(&token),
        Some(json!({"title": "Flow", "kind": "venn", "source": "venn"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "body: {}", body);

    let (status, created) = call(
        r,
        Method::POST,
        &format!("/teams/{}/diagrams", team_id),
        Some(&token),
        Some(json!({"title": "Flow", "kind": "flowchart", "source": "flowchart LR\n A-->B"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let diagram_id = created["id"].as_str().expect("id missing").to_string();

    let (status, patched) = call(
        r,
        Method::PATCH,
        &format!("/diagrams/{}", diagram_id),
        Some(&token),
        Some(json!({"kind": "er_diagram", "source": "erDiagram\n A ||--o{ B : has"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "body: {}", patched);
    assert_eq!(patched["kind"], "er_diagram");

    app.ai.reply("```mermaid\nmindmap\n  root((Launch))\n```");
    let (status, generated) = call(
        r,
        Method::POST,
        &format!("/teams/{}/diagrams/generate", team_id),
        Some(&token),
        Some(json!({"kind": "mindmap", "prompt": "Launch checklist"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "body: {}", generated);
    assert_eq!(generated["title"], "Launch checklist");
    assert_eq!(generated["prompt"], "Launch checklist");

    app.ai.reply("I cannot draw that.");
    let (status, body) = call(
        r,
        Method::POST,
        &format!("/teams/{}/diagrams/generate", team_id),
        Some(&token),
        Some(json!({"kind": "gantt", "prompt": "Roadmap"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["status"], 502);

    let (status, list) = call(r, Method::GET, &format!("/teams/{}/diagrams", team_id), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().map(Vec::len), Some(2));

    let (status, _) = call(r, Method::DELETE, &format!("/diagrams/{}", diagram_id), Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_sprint_suggestion_over_http() {
    let app = app().await;
    let (team_id, owner) = app.identity.team();
    let token = app.token(owner);

    let task = backlog_task(team_id, "Fix login", TaskPriority::Urgent, None, 0);
    app.planner.set_backlog(vec![task.clone()]);
    app.ai.reply(&format!("{}\nLogin is blocking everyone.", task.id));

    let (status, suggestion) = call(
        &app.router,
        Method::POST,
        &format!("/teams/{}/sprint-suggestions", team_id),
        Some(&token),
        Some(json!({"goal": "Stabilize auth", "capacity": 5})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "body: {}", suggestion);
    assert_eq!(suggestion["tasks"][0]["id"], task.id.to_string());
    assert_eq!(suggestion["tasks"][0]["priority"], "urgent");
    assert_eq!(suggestion["model"], "mock-model");
}

#[tokio::test]
async fn test_gateway_errors_map_to_problems() {
    let app = app().await;
    let (team_id, owner) = app.identity.team();
    let token = app.token(owner);

    app.ai.fail(ai_gateway::AiGatewayError::NoKeyConfigured {
        provider: ai_gateway::ProviderKind::OpenAi,
    });
    let (status, body) = call(
        &app.router,
        Method::POST,
        &format!("/teams/{}/diagrams/generate", team_id),
        Some(&token),
        Some(json!({"kind": "flowchart", "prompt": "Checkout"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);

    let stranger = app.token(Uuid::new_v4());
    let (status, _) = call(
        &app.router,
        Method::GET,
        &format!("/teams/{}/brainstorms", team_id),
        Some(&stranger),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = call(&app.router, Method::GET, &format!("/teams/{}/brainstorms", team_id), None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
