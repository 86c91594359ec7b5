//! Native client implementation - wraps domain service for in-process calls

use crate::contract::{IdentityApi, IdentityError, TeamRole, User};
use crate::domain::Service;
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

/// Native client that directly calls the domain service.
///
/// Handed to the planner, ideation and realtime modules so they can check
/// team membership without going through HTTP.
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
impl IdentityApi for NativeClient {
    async fn get_user(&self, user_id: Uuid) -> Result<User, IdentityError> {
        self.service.get_user(user_id).await
    }

    async fn team_role(&self, team_id: Uuid, user_id: Uuid) -> Result<Option<TeamRole>, IdentityError> {
        self.service.team_role(team_id, user_id).await
    }

    async fn require_member(&self, team_id: Uuid, user_id: Uuid) -> Result<TeamRole, IdentityError> {
        self.service.require_member(team_id, user_id).await
    }

    async fn team_member_ids(&self, team_id: Uuid) -> Result<Vec<Uuid>, IdentityError> {
        self.service.team_member_ids(team_id).await
    }
}
