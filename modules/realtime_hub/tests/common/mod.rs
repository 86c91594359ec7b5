//! Shared fixtures for realtime hub tests
#![allow(dead_code)]

use async_trait::async_trait;
use brainforge_kit::{Role, SecurityCtx};
use parking_lot::RwLock;
use realtime_hub::config::Config;
use realtime_hub::domain::Service;
use realtime_hub::{RealtimeError, Room, RoomAuthorizer};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use uuid::Uuid;

pub fn print_test_header(test_name: &str, purpose: &[&str]) {
    println!("\n🧪 TEST: {}", test_name);
    if let Some(first) = purpose.first() {
        println!("📋 PURPOSE: {}", first);
    }
    for line in purpose.iter().skip(1) {
        println!("   {}", line);
    }
}

pub fn ctx(user_id: Uuid) -> SecurityCtx {
    SecurityCtx::new(user_id, format!("{}@example.com", user_id), Role::Member)
}

/// Grants access per room id; team, board and session rooms share the table
#[derive(Default)]
pub struct MockAuthorizer {
    members: RwLock<HashMap<Uuid, HashSet<Uuid>>>,
    names: RwLock<HashMap<Uuid, String>>,
}

impl MockAuthorizer {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn allow(&self, room_id: Uuid, user_id: Uuid) {
        self.members.write().entry(room_id).or_default().insert(user_id);
    }

    pub fn name(&self, user_id: Uuid, name: &str) {
        self.names.write().insert(user_id, name.to_string());
    }
}

#[async_trait]
impl RoomAuthorizer for MockAuthorizer {
    async fn authorize(&self, room: Room, user_id: Uuid) -> Result<(), RealtimeError> {
        let allowed = self
            .members
            .read()
            .get(&room.id())
            .map_or(false, |members| members.contains(&user_id));
        if allowed {
            Ok(())
        } else {
            Err(RealtimeError::forbidden("not a member of this team"))
        }
    }

    async fn display_name(&self, user_id: Uuid) -> Option<String> {
        self.names.read().get(&user_id).cloned()
    }
}

pub struct TestEnv {
    pub service: Arc<Service>,
    pub authorizer: Arc<MockAuthorizer>,
}

pub fn create_test_service() -> TestEnv {
    create_test_service_with(Config::default())
}

pub fn create_test_service_with(config: Config) -> TestEnv {
    let authorizer = MockAuthorizer::new();
    let service = Arc::new(Service::new(authorizer.clone(), config));
    TestEnv { service, authorizer }
}
