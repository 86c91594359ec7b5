//! Module declaration and wiring

use crate::api::native::NativeClient;
use crate::config::Config;
use crate::contract::RealtimeApi;
use crate::domain::{RoomAuthorizer, Service};
use anyhow::Result;
use axum::Router;
use brainforge_kit::RestModule;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Realtime hub module
pub struct RealtimeModule {
    service: Arc<Service>,
}

impl RealtimeModule {
    pub fn new(config: Config, authorizer: Arc<dyn RoomAuthorizer>) -> Self {
        let service = Arc::new(Service::new(authorizer, config));
        tracing::info!("Realtime hub initialized");
        Self { service }
    }

    pub fn service(&self) -> Arc<Service> {
        self.service.clone()
    }

    pub fn client(&self) -> Arc<dyn RealtimeApi> {
        Arc::new(NativeClient::new(self.service.clone()))
    }

    /// Sweep expired presence every `prune_interval` until cancelled
    pub fn spawn_pruner(&self, cancel: CancellationToken) -> JoinHandle<()> {
        let service = self.service.clone();
        let period = service.config().prune_interval;

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            tracing::debug!(?period, "presence pruner started");

            loop {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        tracing::debug!("presence pruner stopped");
                        break;
                    }
                    _ = ticker.tick() => {
                        service.prune_expired(chrono::Utc::now());
                    }
                }
            }
        })
    }
}

impl RestModule for RealtimeModule {
    fn register_rest(&self, router: Router) -> Result<Router> {
        tracing::info!("Registering realtime hub REST routes");
        crate::api::rest::routes::register_routes(router, self.service.clone())
    }
}
