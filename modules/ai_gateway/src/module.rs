//! Module declaration and wiring

use crate::api::native::NativeClient;
use crate::config::Config;
use crate::contract::AiGatewayApi;
use crate::domain::crypto::KeyCipher;
use crate::domain::Service;
use crate::infra::providers::build_registry;
use crate::infra::storage::repositories::{SeaOrmAiKeyRepository, SeaOrmUsageRepository};
use anyhow::{Context, Result};
use axum::Router;
use brainforge_kit::{DbModule, RestModule};
use sea_orm::DatabaseConnection;
use std::sync::Arc;

/// AI gateway module
pub struct AiGatewayModule {
    service: Arc<Service>,
}

impl AiGatewayModule {
    /// Fails when the encryption secret is missing or the HTTP client cannot be built
    pub fn new(config: Config, db: Arc<DatabaseConnection>) -> Result<Self> {
        let cipher = KeyCipher::new(&config.encryption_secret)?;
        let providers = build_registry(&config).context("failed to set up ai providers")?;

        let service = Arc::new(Service::new(
            Arc::new(SeaOrmAiKeyRepository::new(db.clone())),
            Arc::new(SeaOrmUsageRepository::new(db)),
            providers,
            cipher,
            config,
        ));
        tracing::info!("AI gateway initialized");

        Ok(Self { service })
    }

    pub fn service(&self) -> Arc<Service> {
        self.service.clone()
    }

    /// Native client for ideation
    pub fn client(&self) -> Arc<dyn AiGatewayApi> {
        Arc::new(NativeClient::new(self.service.clone()))
    }
}

#[async_trait::async_trait]
impl DbModule for AiGatewayModule {
    async fn migrate(&self, db: &DatabaseConnection) -> Result<()> {
        use crate::infra::storage::migrations::Migrator;
        use sea_orm_migration::MigratorTrait;

        Migrator::up(db, None).await?;
        tracing::info!("AI gateway migrations completed");
        Ok(())
    }
}

impl RestModule for AiGatewayModule {
    fn register_rest(&self, router: Router) -> Result<Router> {
        tracing::info!("Registering AI gateway REST routes");
        crate::api::rest::routes::register_routes(router, self.service.clone())
    }
}
