//! Module lifecycle contracts used by the server to assemble the application

use axum::Router;
use sea_orm::DatabaseConnection;

/// A module that owns database tables
#[async_trait::async_trait]
pub trait DbModule: Send + Sync {
    /// Apply the module's pending migrations
    async fn migrate(&self, db: &DatabaseConnection) -> anyhow::Result<()>;
}

/// A module that exposes REST routes
pub trait RestModule: Send + Sync {
    /// Add the module's routes to `router`.
    ///
    /// Routes are registered relative to the API prefix; authentication is
    /// applied by the server around the whole router.
    fn register_rest(&self, router: Router) -> anyhow::Result<Router>;

    /// Add routes that must stay reachable without a bearer token
    fn register_public_rest(&self, router: Router) -> anyhow::Result<Router> {
        Ok(router)
    }
}
