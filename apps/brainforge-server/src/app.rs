//! Module assembly and the HTTP application

use crate::bridge::{
    spawn_identity_bridge, AuditLogPublisher, IdentityEventRelay, IdentityTargets, MembershipAuthorizer,
    RealtimeSink,
};
use crate::config::{AppConfig, ServerConfig};
use ai_gateway::AiGatewayModule;
use anyhow::{Context, Result};
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method, StatusCode},
    middleware,
    routing::get,
    Extension, Json, Router,
};
use brainforge_kit::{require_auth, DbModule, RestModule, TokenService};
use identity_service::domain::IdentityEvent;
use identity_service::IdentityModule;
use ideation_service::IdeationModule;
use planner_service::PlannerModule;
use realtime_hub::RealtimeModule;
use sea_orm::DatabaseConnection;
use serde_json::{json, Value};
use settings_service::SettingsModule;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

pub const API_PREFIX: &str = "/api/v1";

/// Every module of the server, wired together
pub struct Modules {
    pub tokens: Arc<TokenService>,
    pub identity: IdentityModule,
    pub planner: PlannerModule,
    pub ai: AiGatewayModule,
    pub ideation: IdeationModule,
    pub realtime: RealtimeModule,
    pub settings: SettingsModule,
    identity_events: Option<mpsc::Receiver<IdentityEvent>>,
}

impl Modules {
    pub fn build(config: &AppConfig, db: Arc<DatabaseConnection>) -> Result<Self> {
        let tokens = Arc::new(TokenService::new(
            &config.auth.jwt_secret,
            config.auth.jwt_issuer.clone(),
            config.auth.token_ttl,
        ));

        let (relay, identity_events) = IdentityEventRelay::channel();
        let identity = IdentityModule::new(config.identity.clone(), db.clone(), tokens.clone(), Arc::new(relay));

        let authorizer = Arc::new(MembershipAuthorizer::new(identity.client()));
        let realtime = RealtimeModule::new(config.realtime.clone(), authorizer.clone());
        let sink = Arc::new(RealtimeSink::new(realtime.client()));

        let planner = PlannerModule::new(config.planner.clone(), db.clone(), identity.client(), sink.clone());
        let ai = AiGatewayModule::new(config.ai.clone(), db.clone()).context("failed to build the AI gateway")?;
        let ideation = IdeationModule::new(
            config.ideation.clone(),
            db.clone(),
            identity.client(),
            planner.client(),
            ai.client(),
            sink,
        );
        authorizer.attach_ideation(ideation.client());

        let settings = SettingsModule::new(config.settings.clone(), db, Arc::new(AuditLogPublisher));

        Ok(Self {
            tokens,
            identity,
            planner,
            ai,
            ideation,
            realtime,
            settings,
            identity_events: Some(identity_events),
        })
    }

    fn db_modules(&self) -> [(&'static str, &dyn DbModule); 5] {
        [
            ("identity", &self.identity),
            ("planner", &self.planner),
            ("ai_gateway", &self.ai),
            ("ideation", &self.ideation),
            ("settings", &self.settings),
        ]
    }

    fn rest_modules(&self) -> [&dyn RestModule; 6] {
        [
            &self.identity,
            &self.planner,
            &self.ai,
            &self.ideation,
            &self.settings,
            &self.realtime,
        ]
    }

    /// Apply every module's migrations
    pub async fn migrate(&self, db: &DatabaseConnection) -> Result<()> {
        for (name, module) in self.db_modules() {
            module
                .migrate(db)
                .await
                .with_context(|| format!("{} migrations failed", name))?;
        }
        tracing::info!("All migrations applied");
        Ok(())
    }

    /// Start the identity event bridge and the presence pruner
    pub fn spawn_background(&mut self, cancel: CancellationToken) -> Vec<JoinHandle<()>> {
        let mut handles = vec![self.realtime.spawn_pruner(cancel.clone())];

        match self.identity_events.take() {
            Some(rx) => {
                let targets = IdentityTargets {
                    notifications: self.planner.notifications(),
                    planner: self.planner.client(),
                    ideation: self.ideation.client(),
                    realtime: self.realtime.client(),
                };
                handles.push(spawn_identity_bridge(rx, targets, cancel));
            }
            None => tracing::warn!("identity event bridge already started"),
        }

        handles
    }

    /// `/health` plus the API under `/api/v1`; only `register_public_rest`
    /// routes skip bearer authentication
    pub fn router(&self, server: &ServerConfig, db: Arc<DatabaseConnection>) -> Result<Router> {
        let mut public = Router::new();
        let mut protected = Router::new();
        for module in self.rest_modules() {
            public = module.register_public_rest(public)?;
            protected = module.register_rest(protected)?;
        }
        let protected = protected.layer(middleware::from_fn_with_state(self.tokens.clone(), require_auth));

        let router = Router::new()
            .route("/health", get(health))
            .nest(API_PREFIX, public.merge(protected))
            .layer(Extension(db))
            .layer(DefaultBodyLimit::max(server.body_limit_bytes))
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::x_request_id())
                    .layer(cors_layer(&server.cors_allowed_origins)?)
                    .layer(TimeoutLayer::new(server.request_timeout)),
            );

        Ok(router)
    }
}

fn cors_layer(origins: &[String]) -> Result<CorsLayer> {
    let allow_origin = if origins.iter().any(|o| o == "*") {
        AllowOrigin::from(Any)
    } else {
        let origins = origins
            .iter()
            .map(|o| HeaderValue::from_str(o).with_context(|| format!("invalid CORS origin '{}'", o)))
            .collect::<Result<Vec<_>>>()?;
        AllowOrigin::list(origins)
    };

    Ok(CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]))
}

/// GET /health
async fn health(Extension(db): Extension<Arc<DatabaseConnection>>) -> (StatusCode, Json<Value>) {
    match db.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "database": "ok",
                "version": env!("CARGO_PKG_VERSION"),
            })),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check: database ping failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "database": "unreachable",
                    "version": env!("CARGO_PKG_VERSION"),
                })),
            )
        }
    }
}
