//! Shared fixtures for identity service tests
#![allow(dead_code)]

use brainforge_kit::{Role, SecurityCtx, TokenService};
use identity_service::config::Config;
use identity_service::contract::*;
use identity_service::domain::{IdentityEvent, IdentityEventPublisher, Service};
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;

pub fn print_test_header(test_name: &str, purpose: &[&str]) {
    println!("\n🧪 TEST: {}", test_name);
    if let Some(first) = purpose.first() {
        println!("📋 PURPOSE: {}", first);
    }
    for line in purpose.iter().skip(1) {
        println!("   {}", line);
    }
}

pub fn token_service() -> Arc<TokenService> {
    Arc::new(TokenService::new(
        "identity-test-secret",
        "brainforge-test",
        Duration::from_secs(3600),
    ))
}

pub fn ctx_for(user: &User) -> SecurityCtx {
    SecurityCtx::new(user.id, user.email.clone(), user.role)
}

pub fn admin_ctx(user: &User) -> SecurityCtx {
    SecurityCtx::new(user.id, user.email.clone(), Role::Admin)
}

/// Publisher that records every event it receives
#[derive(Default)]
pub struct RecordingPublisher {
    events: RwLock<Vec<IdentityEvent>>,
}

impl RecordingPublisher {
    pub fn events(&self) -> Vec<IdentityEvent> {
        self.events.read().clone()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.events.read().iter().map(|e| e.name()).collect()
    }
}

#[async_trait::async_trait]
impl IdentityEventPublisher for RecordingPublisher {
    async fn publish(&self, event: IdentityEvent) -> anyhow::Result<()> {
        println!("   📣 event: {}", event.name());
        self.events.write().push(event);
        Ok(())
    }
}

// Mock repository implementations for testing
pub mod mocks {
    use super::*;
    use anyhow::Result;
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use identity_service::domain::{
        InvitationRepository, StoredUser, TeamRepository, UserRepository,
    };
    use std::collections::HashMap;
    use uuid::Uuid;

    /// One in-memory store backing all three repositories, so member
    /// listings can join against users the way the SQL implementation does
    #[derive(Default)]
    pub struct MockStore {
        users: RwLock<HashMap<Uuid, StoredUser>>,
        teams: RwLock<HashMap<Uuid, Team>>,
        members: RwLock<HashMap<(Uuid, Uuid), TeamMember>>,
        invitations: RwLock<HashMap<Uuid, Invitation>>,
    }

    impl MockStore {
        pub fn new() -> Arc<Self> {
            Arc::new(Self::default())
        }

        pub fn member_count(&self, team_id: Uuid) -> usize {
            self.members.read().keys().filter(|(t, _)| *t == team_id).count()
        }

        pub fn invitation(&self, id: Uuid) -> Option<Invitation> {
            self.invitations.read().get(&id).cloned()
        }

        /// Force an invitation's expiry into the past
        pub fn expire_invitation(&self, id: Uuid) {
            if let Some(inv) = self.invitations.write().get_mut(&id) {
                inv.expires_at = Utc::now() - chrono::Duration::minutes(1);
            }
        }

        pub fn print_state(&self, context: &str) {
            println!("\n========== Identity Store State: {} ==========", context);
            println!("Users: {}", self.users.read().len());
            for stored in self.users.read().values() {
                println!("  {} <{}> role={}", stored.user.id, stored.user.email, stored.user.role.as_str());
            }
            println!("Teams: {}", self.teams.read().len());
            for team in self.teams.read().values() {
                println!("  {} '{}' owner={}", team.id, team.name, team.owner_id);
            }
            println!("Memberships: {}", self.members.read().len());
            println!("Invitations: {}", self.invitations.read().len());
            println!("==============================================\n");
        }
    }

    #[async_trait]
    impl UserRepository for MockStore {
        async fn create(&self, user: &User, password_hash: &str) -> Result<User> {
            self.users.write().insert(
                user.id,
                StoredUser {
                    user: user.clone(),
                    password_hash: password_hash.to_string(),
                },
            );
            Ok(user.clone())
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<StoredUser>> {
            Ok(self.users.read().get(&id).cloned())
        }

        async fn find_by_email(&self, email: &str) -> Result<Option<StoredUser>> {
            Ok(self
                .users
                .read()
                .values()
                .find(|s| s.user.email == email)
                .cloned())
        }

        async fn update(&self, user: &User) -> Result<User> {
            let mut users = self.users.write();
            let stored = users
                .get_mut(&user.id)
                .ok_or_else(|| anyhow::anyhow!("missing user"))?;
            stored.user = user.clone();
            Ok(user.clone())
        }

        async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<()> {
            if let Some(stored) = self.users.write().get_mut(&id) {
                stored.password_hash = password_hash.to_string();
            }
            Ok(())
        }

        async fn touch_login(&self, id: Uuid, at: DateTime<Utc>) -> Result<()> {
            if let Some(stored) = self.users.write().get_mut(&id) {
                stored.user.last_login_at = Some(at);
            }
            Ok(())
        }

        async fn set_role(&self, id: Uuid, role: Role) -> Result<()> {
            if let Some(stored) = self.users.write().get_mut(&id) {
                stored.user.role = role;
            }
            Ok(())
        }

        async fn list(&self, limit: u64, offset: u64) -> Result<Vec<User>> {
            let mut users: Vec<User> = self.users.read().values().map(|s| s.user.clone()).collect();
            users.sort_by_key(|u| u.created_at);
            Ok(users
                .into_iter()
                .skip(offset as usize)
                .take(limit as usize)
                .collect())
        }

        async fn count(&self) -> Result<u64> {
            Ok(self.users.read().len() as u64)
        }
    }

    #[async_trait]
    impl TeamRepository for MockStore {
        async fn create_with_owner(&self, team: &Team, owner: &TeamMember) -> Result<Team> {
            self.teams.write().insert(team.id, team.clone());
            self.members
                .write()
                .insert((owner.team_id, owner.user_id), owner.clone());
            Ok(team.clone())
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<Team>> {
            Ok(self.teams.read().get(&id).cloned())
        }

        async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<(Team, TeamRole)>> {
            let teams = self.teams.read();
            Ok(self
                .members
                .read()
                .values()
                .filter(|m| m.user_id == user_id)
                .filter_map(|m| teams.get(&m.team_id).map(|t| (t.clone(), m.role)))
                .collect())
        }

        async fn update(&self, team: &Team) -> Result<Team> {
            self.teams.write().insert(team.id, team.clone());
            Ok(team.clone())
        }

        async fn delete(&self, id: Uuid) -> Result<()> {
            self.teams.write().remove(&id);
            self.members.write().retain(|(team_id, _), _| *team_id != id);
            self.invitations.write().retain(|_, inv| inv.team_id != id);
            Ok(())
        }

        async fn add_member(&self, member: &TeamMember) -> Result<()> {
            self.members
                .write()
                .insert((member.team_id, member.user_id), member.clone());
            Ok(())
        }

        async fn find_member(&self, team_id: Uuid, user_id: Uuid) -> Result<Option<TeamMember>> {
            Ok(self.members.read().get(&(team_id, user_id)).cloned())
        }

        async fn list_members(&self, team_id: Uuid) -> Result<Vec<MemberProfile>> {
            let users = self.users.read();
            let mut members: Vec<MemberProfile> = self
                .members
                .read()
                .values()
                .filter(|m| m.team_id == team_id)
                .filter_map(|m| {
                    users.get(&m.user_id).map(|s| MemberProfile {
                        user_id: m.user_id,
                        email: s.user.email.clone(),
                        display_name: s.user.display_name.clone(),
                        role: m.role,
                        joined_at: m.joined_at,
                    })
                })
                .collect();
            members.sort_by_key(|m| m.joined_at);
            Ok(members)
        }

        async fn update_member_role(&self, team_id: Uuid, user_id: Uuid, role: TeamRole) -> Result<()> {
            if let Some(member) = self.members.write().get_mut(&(team_id, user_id)) {
                member.role = role;
            }
            Ok(())
        }

        async fn remove_member(&self, team_id: Uuid, user_id: Uuid) -> Result<()> {
            self.members.write().remove(&(team_id, user_id));
            Ok(())
        }
    }

    #[async_trait]
    impl InvitationRepository for MockStore {
        async fn create(&self, invitation: &Invitation) -> Result<Invitation> {
            self.invitations
                .write()
                .insert(invitation.id, invitation.clone());
            Ok(invitation.clone())
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<Invitation>> {
            Ok(self.invitations.read().get(&id).cloned())
        }

        async fn find_by_token(&self, token: &str) -> Result<Option<Invitation>> {
            Ok(self
                .invitations
                .read()
                .values()
                .find(|inv| inv.token == token)
                .cloned())
        }

        async fn find_pending(&self, team_id: Uuid, email: &str) -> Result<Option<Invitation>> {
            Ok(self
                .invitations
                .read()
                .values()
                .find(|inv| {
                    inv.team_id == team_id
                        && inv.email == email
                        && inv.status == InvitationStatus::Pending
                })
                .cloned())
        }

        async fn list_for_team(&self, team_id: Uuid) -> Result<Vec<Invitation>> {
            let mut list: Vec<Invitation> = self
                .invitations
                .read()
                .values()
                .filter(|inv| inv.team_id == team_id)
                .cloned()
                .collect();
            list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            Ok(list)
        }

        async fn list_pending_for_email(&self, email: &str) -> Result<Vec<Invitation>> {
            Ok(self
                .invitations
                .read()
                .values()
                .filter(|inv| inv.email == email && inv.status == InvitationStatus::Pending)
                .cloned()
                .collect())
        }

        async fn update_status(
            &self,
            id: Uuid,
            status: InvitationStatus,
            responded_at: Option<DateTime<Utc>>,
        ) -> Result<()> {
            if let Some(inv) = self.invitations.write().get_mut(&id) {
                inv.status = status;
                inv.responded_at = responded_at;
            }
            Ok(())
        }
    }
}

/// Service over a fresh mock store, with its store and event recorder
pub fn create_test_service() -> (Service, Arc<mocks::MockStore>, Arc<RecordingPublisher>) {
    let store = mocks::MockStore::new();
    let events = Arc::new(RecordingPublisher::default());
    let service = Service::new(
        store.clone(),
        store.clone(),
        store.clone(),
        token_service(),
        events.clone(),
        Config::default(),
    );
    (service, store, events)
}

/// Register a user and return it
pub async fn register(service: &Service, email: &str) -> User {
    service
        .register(email, "correct horse battery", "Test User")
        .await
        .expect("register failed")
        .user
}
