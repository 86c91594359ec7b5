//! Module declaration and wiring

use crate::config::Config;
use crate::domain::{Service, SettingsEventPublisher};
use crate::infra::storage::repositories::SeaOrmSettingsRepository;
use anyhow::Result;
use axum::Router;
use brainforge_kit::{DbModule, RestModule};
use sea_orm::DatabaseConnection;
use std::sync::Arc;

/// Settings service module
pub struct SettingsModule {
    service: Arc<Service>,
}

impl SettingsModule {
    pub fn new(
        config: Config,
        db: Arc<DatabaseConnection>,
        event_publisher: Arc<dyn SettingsEventPublisher>,
    ) -> Self {
        let repo = Arc::new(SeaOrmSettingsRepository::new(db));
        let service = Arc::new(Service::new(repo, event_publisher, config));
        tracing::info!("Settings service initialized");

        Self { service }
    }

    pub fn service(&self) -> Arc<Service> {
        self.service.clone()
    }
}

#[async_trait::async_trait]
impl DbModule for SettingsModule {
    /// Run migrations, then create configured default settings
    async fn migrate(&self, db: &DatabaseConnection) -> Result<()> {
        use crate::infra::storage::migrations::Migrator;
        use sea_orm_migration::MigratorTrait;

        Migrator::up(db, None).await?;
        self.service
            .seed_defaults()
            .await
            .map_err(|e| anyhow::anyhow!("seeding settings failed: {}", e))?;
        tracing::info!("Settings service migrations completed");
        Ok(())
    }
}

impl RestModule for SettingsModule {
    fn register_rest(&self, router: Router) -> Result<Router> {
        tracing::info!("Registering settings service REST routes");
        crate::api::rest::routes::register_routes(router, self.service.clone())
    }
}
