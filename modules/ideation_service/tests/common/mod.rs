//! Shared fixtures for ideation service tests
#![allow(dead_code)]

use ai_gateway::{AiGatewayApi, AiGatewayError, ChatCompletion, ChatRequest, ProviderKind, TokenUsage};
use brainforge_kit::{Role, SecurityCtx};
use chrono::{NaiveDate, Utc};
use identity_service::{IdentityApi, IdentityError, TeamRole, User};
use ideation_service::config::Config;
use ideation_service::domain::{IdeationEvent, IdeationEventSink, Service};
use parking_lot::{Mutex, RwLock};
use planner_service::{NewTask, PlannerApi, PlannerError, Task, TaskPriority, TaskStatus};
use std::collections::{HashMap, VecDeque};
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

/// In-memory team directory standing in for the identity module
#[derive(Default)]
pub struct MockIdentity {
    teams: RwLock<HashMap<Uuid, HashMap<Uuid, TeamRole>>>,
}

impl MockIdentity {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Create a team owned by a fresh user; returns (team_id, owner_id)
    pub fn team(&self) -> (Uuid, Uuid) {
        let team_id = Uuid::new_v4();
        let owner_id = Uuid::new_v4();
        self.teams
            .write()
            .insert(team_id, HashMap::from([(owner_id, TeamRole::Owner)]));
        (team_id, owner_id)
    }

    pub fn add_member(&self, team_id: Uuid, role: TeamRole) -> Uuid {
        let user_id = Uuid::new_v4();
        self.teams.write().entry(team_id).or_default().insert(user_id, role);
        user_id
    }
}

#[async_trait::async_trait]
impl IdentityApi for MockIdentity {
    async fn get_user(&self, user_id: Uuid) -> Result<User, IdentityError> {
        Err(IdentityError::not_found("user", user_id))
    }

    async fn team_role(&self, team_id: Uuid, user_id: Uuid) -> Result<Option<TeamRole>, IdentityError> {
        Ok(self
            .teams
            .read()
            .get(&team_id)
            .and_then(|members| members.get(&user_id).copied()))
    }

    async fn require_member(&self, team_id: Uuid, user_id: Uuid) -> Result<TeamRole, IdentityError> {
        let teams = self.teams.read();
        let members = teams
            .get(&team_id)
            .ok_or_else(|| IdentityError::not_found("team", team_id))?;
        members
            .get(&user_id)
            .copied()
            .ok_or_else(|| IdentityError::forbidden("not a member of this team"))
    }

    async fn team_member_ids(&self, team_id: Uuid) -> Result<Vec<Uuid>, IdentityError> {
        Ok(self
            .teams
            .read()
            .get(&team_id)
            .map(|members| members.keys().copied().collect())
            .unwrap_or_default())
    }
}

pub fn backlog_task(team_id: Uuid, title: &str, priority: TaskPriority, due: Option<NaiveDate>, position: i32) -> Task {
    let now = Utc::now();
    Task {
        id: Uuid::new_v4(),
        team_id,
        title: title.to_string(),
        description: None,
        status: TaskStatus::Todo,
        priority,
        assignee_id: None,
        creator_id: Uuid::new_v4(),
        sprint_id: None,
        due_date: due,
        position,
        tags: vec![],
        created_at: now,
        updated_at: now,
        completed_at: None,
    }
}

/// Planner stand-in: records created tasks and serves a fixed backlog
#[derive(Default)]
pub struct MockPlanner {
    created: Mutex<Vec<(Uuid, NewTask)>>,
    backlog: RwLock<Vec<Task>>,
    purged: Mutex<Vec<Uuid>>,
    /// Task creations allowed before every call fails
    fail_after: Mutex<Option<usize>>,
}

impl MockPlanner {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_backlog(&self, tasks: Vec<Task>) {
        *self.backlog.write() = tasks;
    }

    pub fn fail_after(&self, successes: usize) {
        *self.fail_after.lock() = Some(successes);
    }

    pub fn created(&self) -> Vec<(Uuid, NewTask)> {
        self.created.lock().clone()
    }

    pub fn purged(&self) -> Vec<Uuid> {
        self.purged.lock().clone()
    }
}

#[async_trait::async_trait]
impl PlannerApi for MockPlanner {
    async fn create_task(&self, ctx: &SecurityCtx, team_id: Uuid, task: NewTask) -> Result<Task, PlannerError> {
        let mut created = self.created.lock();
        if let Some(limit) = *self.fail_after.lock() {
            if created.len() >= limit {
                return Err(PlannerError::Internal);
            }
        }
        let now = Utc::now();
        let stored = Task {
            id: Uuid::new_v4(),
            team_id,
            title: task.title.clone(),
            description: task.description.clone(),
            status: task.status.unwrap_or(TaskStatus::Todo),
            priority: task.priority.unwrap_or_default(),
            assignee_id: task.assignee_id,
            creator_id: ctx.user_id,
            sprint_id: task.sprint_id,
            due_date: task.due_date,
            position: created.len() as i32,
            tags: task.tags.clone(),
            created_at: now,
            updated_at: now,
            completed_at: None,
        };
        created.push((team_id, task));
        Ok(stored)
    }

    async fn backlog(&self, _ctx: &SecurityCtx, team_id: Uuid) -> Result<Vec<Task>, PlannerError> {
        Ok(self
            .backlog
            .read()
            .iter()
            .filter(|t| t.team_id == team_id)
            .cloned()
            .collect())
    }

    async fn purge_team(&self, team_id: Uuid) -> Result<(), PlannerError> {
        self.purged.lock().push(team_id);
        Ok(())
    }
}

/// One recorded gateway call
#[derive(Debug, Clone)]
pub struct AiCall {
    pub user_id: Uuid,
    pub feature: String,
    pub provider: Option<ProviderKind>,
    pub request: ChatRequest,
}

/// Gateway stand-in with scripted replies; unscripted calls answer "ok"
#[derive(Default)]
pub struct MockAi {
    replies: Mutex<VecDeque<Result<String, AiGatewayError>>>,
    calls: Mutex<Vec<AiCall>>,
}

impl MockAi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reply(&self, content: &str) {
        self.replies.lock().push_back(Ok(content.to_string()));
    }

    pub fn fail(&self, error: AiGatewayError) {
        self.replies.lock().push_back(Err(error));
    }

    pub fn calls(&self) -> Vec<AiCall> {
        self.calls.lock().clone()
    }
}

#[async_trait::async_trait]
impl AiGatewayApi for MockAi {
    async fn chat(
        &self,
        user_id: Uuid,
        feature: &str,
        provider: Option<ProviderKind>,
        request: ChatRequest,
    ) -> Result<ChatCompletion, AiGatewayError> {
        self.calls.lock().push(AiCall {
            user_id,
            feature: feature.to_string(),
            provider,
            request,
        });
        let content = self.replies.lock().pop_front().unwrap_or_else(|| Ok("ok".to_string()))?;
        Ok(ChatCompletion {
            provider: provider.unwrap_or(ProviderKind::Claude),
            model: "mock-model".to_string(),
            content,
            usage: TokenUsage {
                input_tokens: 100,
                output_tokens: 50,
            },
            finish_reason: Some("stop".to_string()),
        })
    }
}

/// Sink that records every event it receives
#[derive(Default)]
pub struct RecordingSink {
    events: RwLock<Vec<IdeationEvent>>,
}

impl RecordingSink {
    pub fn names(&self) -> Vec<String> {
        self.events.read().iter().map(|e| e.name()).collect()
    }

    pub fn rooms(&self) -> Vec<String> {
        self.events.read().iter().map(|e| e.room()).collect()
    }
}

#[async_trait::async_trait]
impl IdeationEventSink for RecordingSink {
    async fn publish(&self, event: IdeationEvent) -> anyhow::Result<()> {
        println!("   📣 event: {} -> {}", event.name(), event.room());
        self.events.write().push(event);
        Ok(())
    }
}

// Mock repository implementations for testing
pub mod mocks {
    use super::*;
    use anyhow::Result;
    use async_trait::async_trait;
    use ideation_service::contract::{BrainstormSession, Diagram};
    use ideation_service::domain::{DiagramRepository, SessionRepository};

    #[derive(Default)]
    pub struct MockStore {
        sessions: RwLock<HashMap<Uuid, BrainstormSession>>,
        diagrams: RwLock<HashMap<Uuid, Diagram>>,
    }

    impl MockStore {
        pub fn new() -> Arc<Self> {
            Arc::new(Self::default())
        }

        pub fn session(&self, id: Uuid) -> Option<BrainstormSession> {
            self.sessions.read().get(&id).cloned()
        }

        pub fn counts(&self) -> (usize, usize) {
            (self.sessions.read().len(), self.diagrams.read().len())
        }

        pub fn print_state(&self, context: &str) {
            println!("\n========== Ideation Store State: {} ==========", context);
            for s in self.sessions.read().values() {
                println!("  session '{}' [{}] ideas={}", s.title, s.status.as_str(), s.ideas.len());
                for i in &s.ideas {
                    println!("    - {} ({} votes)", i.text, i.votes());
                }
            }
            for d in self.diagrams.read().values() {
                println!("  diagram '{}' [{}]", d.title, d.kind.as_str());
            }
            println!("==============================================\n");
        }
    }

    #[async_trait]
    impl SessionRepository for MockStore {
        async fn create(&self, session: &BrainstormSession) -> Result<BrainstormSession> {
            self.sessions.write().insert(session.id, session.clone());
            Ok(session.clone())
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<BrainstormSession>> {
            Ok(self.sessions.read().get(&id).cloned())
        }

        async fn list_by_team(&self, team_id: Uuid) -> Result<Vec<BrainstormSession>> {
            let mut sessions: Vec<BrainstormSession> = self
                .sessions
                .read()
                .values()
                .filter(|s| s.team_id == team_id)
                .cloned()
                .collect();
            sessions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            Ok(sessions)
        }

        async fn update(&self, session: &BrainstormSession) -> Result<BrainstormSession> {
            self.sessions.write().insert(session.id, session.clone());
            Ok(session.clone())
        }

        async fn delete(&self, id: Uuid) -> Result<()> {
            self.sessions.write().remove(&id);
            Ok(())
        }

        async fn delete_by_team(&self, team_id: Uuid) -> Result<u64> {
            let mut sessions = self.sessions.write();
            let before = sessions.len();
            sessions.retain(|_, s| s.team_id != team_id);
            Ok((before - sessions.len()) as u64)
        }
    }

    #[async_trait]
    impl DiagramRepository for MockStore {
        async fn create(&self, diagram: &Diagram) -> Result<Diagram> {
            self.diagrams.write().insert(diagram.id, diagram.clone());
            Ok(diagram.clone())
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<Diagram>> {
            Ok(self.diagrams.read().get(&id).cloned())
        }

        async fn list_by_team(&self, team_id: Uuid) -> Result<Vec<Diagram>> {
            let mut diagrams: Vec<Diagram> = self
                .diagrams
                .read()
                .values()
                .filter(|d| d.team_id == team_id)
                .cloned()
                .collect();
            diagrams.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
            Ok(diagrams)
        }

        async fn update(&self, diagram: &Diagram) -> Result<Diagram> {
            self.diagrams.write().insert(diagram.id, diagram.clone());
            Ok(diagram.clone())
        }

        async fn delete(&self, id: Uuid) -> Result<()> {
            self.diagrams.write().remove(&id);
            Ok(())
        }

        async fn delete_by_team(&self, team_id: Uuid) -> Result<u64> {
            let mut diagrams = self.diagrams.write();
            let before = diagrams.len();
            diagrams.retain(|_, d| d.team_id != team_id);
            Ok((before - diagrams.len()) as u64)
        }
    }
}

pub struct TestEnv {
    pub service: Service,
    pub store: Arc<mocks::MockStore>,
    pub identity: Arc<MockIdentity>,
    pub planner: Arc<MockPlanner>,
    pub ai: Arc<MockAi>,
    pub sink: Arc<RecordingSink>,
}

pub fn create_test_service() -> TestEnv {
    create_test_service_with(Config::default())
}

pub fn create_test_service_with(config: Config) -> TestEnv {
    let store = mocks::MockStore::new();
    let identity = MockIdentity::new();
    let planner = MockPlanner::new();
    let ai = MockAi::new();
    let sink = Arc::new(RecordingSink::default());
    let service = Service::new(
        store.clone(),
        store.clone(),
        identity.clone(),
        planner.clone(),
        ai.clone(),
        sink.clone(),
        config,
    );
    TestEnv {
        service,
        store,
        identity,
        planner,
        ai,
        sink,
    }
}
