//! Native client implementation - wraps domain service for in-process calls

use crate::contract::{IdeationApi, IdeationError};
use crate::domain::Service;
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

/// Used by the server's identity event bridge and realtime room checks
#[derive(Clone)]
pub struct NativeClient {
    service: Arc<Service>,
}

impl NativeClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl IdeationApi for NativeClient {
    async fn purge_team(&self, team_id: Uuid) -> Result<(), IdeationError> {
        self.service.purge_team(team_id).await
    }

    async fn session_team(&self, session_id: Uuid) -> Result<Uuid, IdeationError> {
        self.service.session_team(session_id).await
    }
}
