//! Module declaration and wiring

use crate::api::native::NativeClient;
use crate::config::Config;
use crate::contract::IdentityApi;
use crate::domain::{IdentityEventPublisher, Service};
use crate::infra::storage::repositories::{
    SeaOrmInvitationRepository, SeaOrmTeamRepository, SeaOrmUserRepository,
};
use anyhow::Result;
use axum::Router;
use brainforge_kit::{DbModule, RestModule, TokenService};
use sea_orm::DatabaseConnection;
use std::sync::Arc;

/// Identity service module
pub struct IdentityModule {
    service: Arc<Service>,
}

impl IdentityModule {
    /// Build repositories and the domain service on top of `db`
    pub fn new(
        config: Config,
        db: Arc<DatabaseConnection>,
        tokens: Arc<TokenService>,
        events: Arc<dyn IdentityEventPublisher>,
    ) -> Self {
        let users = Arc::new(SeaOrmUserRepository::new(db.clone()));
        let teams = Arc::new(SeaOrmTeamRepository::new(db.clone()));
        let invitations = Arc::new(SeaOrmInvitationRepository::new(db));

        let service = Arc::new(Service::new(users, teams, invitations, tokens, events, config));
        tracing::info!("Identity service initialized");

        Self { service }
    }

    pub fn service(&self) -> Arc<Service> {
        self.service.clone()
    }

    /// Native client for other modules
    pub fn client(&self) -> Arc<dyn IdentityApi> {
        Arc::new(NativeClient::new(self.service.clone()))
    }
}

#[async_trait::async_trait]
impl DbModule for IdentityModule {
    async fn migrate(&self, db: &DatabaseConnection) -> Result<()> {
        use crate::infra::storage::migrations::Migrator;
        use sea_orm_migration::MigratorTrait;

        Migrator::up(db, None).await?;
        tracing::info!("Identity service migrations completed");
        Ok(())
    }
}

impl RestModule for IdentityModule {
    fn register_rest(&self, router: Router) -> Result<Router> {
        tracing::info!("Registering identity service REST routes");
        crate::api::rest::routes::register_routes(router, self.service.clone())
    }

    fn register_public_rest(&self, router: Router) -> Result<Router> {
        crate::api::rest::routes::register_public_routes(router, self.service.clone())
    }
}
