//! Module declaration and wiring

use crate::api::native::NativeClient;
use crate::config::Config;
use crate::contract::{NotificationApi, PlannerApi};
use crate::domain::{PlannerEventSink, Repositories, Service};
use crate::infra::storage::repositories::{
    SeaOrmEventRepository, SeaOrmNoteRepository, SeaOrmNotificationRepository,
    SeaOrmSprintRepository, SeaOrmTaskRepository,
};
use anyhow::Result;
use axum::Router;
use brainforge_kit::{DbModule, RestModule};
use identity_service::IdentityApi;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

/// Planner service module
pub struct PlannerModule {
    service: Arc<Service>,
}

impl PlannerModule {
    pub fn new(
        config: Config,
        db: Arc<DatabaseConnection>,
        identity: Arc<dyn IdentityApi>,
        sink: Arc<dyn PlannerEventSink>,
    ) -> Self {
        let repos = Repositories {
            tasks: Arc::new(SeaOrmTaskRepository::new(db.clone())),
            sprints: Arc::new(SeaOrmSprintRepository::new(db.clone())),
            events: Arc::new(SeaOrmEventRepository::new(db.clone())),
            notes: Arc::new(SeaOrmNoteRepository::new(db.clone())),
            notifications: Arc::new(SeaOrmNotificationRepository::new(db)),
        };

        let service = Arc::new(Service::new(repos, identity, sink, config));
        tracing::info!("Planner service initialized");

        Self { service }
    }

    pub fn service(&self) -> Arc<Service> {
        self.service.clone()
    }

    /// Native client for ideation and the server's event bridge
    pub fn client(&self) -> Arc<dyn PlannerApi> {
        Arc::new(NativeClient::new(self.service.clone()))
    }

    pub fn notifications(&self) -> Arc<dyn NotificationApi> {
        Arc::new(NativeClient::new(self.service.clone()))
    }
}

#[async_trait::async_trait]
impl DbModule for PlannerModule {
    async fn migrate(&self, db: &DatabaseConnection) -> Result<()> {
        use crate::infra::storage::migrations::Migrator;
        use sea_orm_migration::MigratorTrait;

        Migrator::up(db, None).await?;
        tracing::info!("Planner service migrations completed");
        Ok(())
    }
}

impl RestModule for PlannerModule {
    fn register_rest(&self, router: Router) -> Result<Router> {
        tracing::info!("Registering planner service REST routes");
        crate::api::rest::routes::register_routes(router, self.service.clone())
    }
}
