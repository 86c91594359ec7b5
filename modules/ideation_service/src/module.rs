//! Module declaration and wiring

use crate::api::native::NativeClient;
use crate::config::Config;
use crate::contract::IdeationApi;
use crate::domain::{IdeationEventSink, Service};
use crate::infra::storage::repositories::{SeaOrmDiagramRepository, SeaOrmSessionRepository};
use ai_gateway::AiGatewayApi;
use anyhow::Result;
use axum::Router;
use brainforge_kit::{DbModule, RestModule};
use identity_service::IdentityApi;
use planner_service::PlannerApi;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

/// Ideation service module
pub struct IdeationModule {
    service: Arc<Service>,
}

impl IdeationModule {
    pub fn new(
        config: Config,
        db: Arc<DatabaseConnection>,
        identity: Arc<dyn IdentityApi>,
        planner: Arc<dyn PlannerApi>,
        ai: Arc<dyn AiGatewayApi>,
        sink: Arc<dyn IdeationEventSink>,
    ) -> Self {
        let sessions = Arc::new(SeaOrmSessionRepository::new(db.clone()));
        let diagrams = Arc::new(SeaOrmDiagramRepository::new(db));

        let service = Arc::new(Service::new(sessions, diagrams, identity, planner, ai, sink, config));
        tracing::info!("Ideation service initialized");

        Self { service }
    }

    pub fn service(&self) -> Arc<Service> {
        self.service.clone()
    }

    pub fn client(&self) -> Arc<dyn IdeationApi> {
        Arc::new(NativeClient::new(self.service.clone()))
    }
}

#[async_trait::async_trait]
impl DbModule for IdeationModule {
    async fn migrate(&self, db: &DatabaseConnection) -> Result<()> {
        use crate::infra::storage::migrations::Migrator;
        use sea_orm_migration::MigratorTrait;

        Migrator::up(db, None).await?;
        tracing::info!("Ideation service migrations completed");
        Ok(())
    }
}

impl RestModule for IdeationModule {
    fn register_rest(&self, router: Router) -> Result<Router> {
        tracing::info!("Registering ideation service REST routes");
        crate::api::rest::routes::register_routes(router, self.service.clone())
    }
}
