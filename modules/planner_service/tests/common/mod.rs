//! Shared fixtures for planner service tests
#![allow(dead_code)]

use brainforge_kit::{Role, SecurityCtx};
use identity_service::{IdentityApi, IdentityError, TeamRole, User};
use parking_lot::RwLock;
use planner_service::config::Config;
use planner_service::domain::{PlannerEvent, PlannerEventSink, Repositories, Service};
use std::collections::HashMap;
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

    /// Add a fresh user with `role` to the team
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

/// Sink that records every event it receives
#[derive(Default)]
pub struct RecordingSink {
    events: RwLock<Vec<PlannerEvent>>,
}

impl RecordingSink {
    pub fn names(&self) -> Vec<String> {
        self.events.read().iter().map(|e| e.name()).collect()
    }

    pub fn events(&self) -> Vec<PlannerEvent> {
        self.events.read().clone()
    }
}

#[async_trait::async_trait]
impl PlannerEventSink for RecordingSink {
    async fn publish(&self, event: PlannerEvent) -> anyhow::Result<()> {
        println!("   📣 event: {} -> {}", event.name(), event.room());
        self.events.write().push(event);
        Ok(())
    }
}

/// Sink whose transport is always down
pub struct FailingSink;

#[async_trait::async_trait]
impl PlannerEventSink for FailingSink {
    async fn publish(&self, _event: PlannerEvent) -> anyhow::Result<()> {
        Err(anyhow::anyhow!("realtime hub unavailable"))
    }
}

// Mock repository implementations for testing
pub mod mocks {
    use super::*;
    use anyhow::{anyhow, Result};
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use planner_service::contract::*;
    use planner_service::domain::{
        EventRepository, NoteRepository, NotificationRepository, SprintRepository, TaskRepository,
    };

    /// One in-memory store backing all planner repositories
    #[derive(Default)]
    pub struct MockStore {
        tasks: RwLock<HashMap<Uuid, Task>>,
        sprints: RwLock<HashMap<Uuid, SprintPlan>>,
        events: RwLock<HashMap<Uuid, CalendarEvent>>,
        notes: RwLock<HashMap<Uuid, Note>>,
        notifications: RwLock<HashMap<Uuid, Notification>>,
    }

    impl MockStore {
        pub fn new() -> Arc<Self> {
            Arc::new(Self::default())
        }

        pub fn repositories(self: &Arc<Self>) -> Repositories {
            Repositories {
                tasks: self.clone(),
                sprints: self.clone(),
                events: self.clone(),
                notes: self.clone(),
                notifications: self.clone(),
            }
        }

        pub fn task(&self, id: Uuid) -> Option<Task> {
            self.tasks.read().get(&id).cloned()
        }

        pub fn notifications_for(&self, user_id: Uuid) -> Vec<Notification> {
            self.notifications
                .read()
                .values()
                .filter(|n| n.user_id == user_id)
                .cloned()
                .collect()
        }

        pub fn counts(&self) -> (usize, usize, usize, usize) {
            (
                self.tasks.read().len(),
                self.sprints.read().len(),
                self.events.read().len(),
                self.notes.read().len(),
            )
        }

        /// Titles of one column in position order
        pub fn column(&self, team_id: Uuid, status: TaskStatus) -> Vec<(String, i32)> {
            let mut column: Vec<Task> = self
                .tasks
                .read()
                .values()
                .filter(|t| t.team_id == team_id && t.status == status)
                .cloned()
                .collect();
            column.sort_by_key(|t| t.position);
            column.into_iter().map(|t| (t.title, t.position)).collect()
        }

        pub fn print_state(&self, context: &str) {
            println!("\n========== Planner Store State: {} ==========", context);
            let mut tasks: Vec<Task> = self.tasks.read().values().cloned().collect();
            tasks.sort_by_key(|t| (t.status, t.position));
            println!("Tasks: {}", tasks.len());
            for t in &tasks {
                println!("  [{}:{}] '{}' sprint={:?}", t.status.as_str(), t.position, t.title, t.sprint_id);
            }
            println!("Sprints: {}", self.sprints.read().len());
            println!("Events: {}", self.events.read().len());
            println!("Notes: {}", self.notes.read().len());
            println!("Notifications: {}", self.notifications.read().len());
            println!("=============================================\n");
        }
    }

    #[async_trait]
    impl TaskRepository for MockStore {
        async fn create(&self, task: &Task) -> Result<Task> {
            self.tasks.write().insert(task.id, task.clone());
            Ok(task.clone())
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<Task>> {
            Ok(self.tasks.read().get(&id).cloned())
        }

        async fn list_by_team(&self, team_id: Uuid) -> Result<Vec<Task>> {
            Ok(self
                .tasks
                .read()
                .values()
                .filter(|t| t.team_id == team_id)
                .cloned()
                .collect())
        }

        async fn list_column(&self, team_id: Uuid, status: TaskStatus) -> Result<Vec<Task>> {
            let mut column: Vec<Task> = self
                .tasks
                .read()
                .values()
                .filter(|t| t.team_id == team_id && t.status == status)
                .cloned()
                .collect();
            column.sort_by_key(|t| (t.position, t.created_at));
            Ok(column)
        }

        async fn list_by_sprint(&self, sprint_id: Uuid) -> Result<Vec<Task>> {
            Ok(self
                .tasks
                .read()
                .values()
                .filter(|t| t.sprint_id == Some(sprint_id))
                .cloned()
                .collect())
        }

        async fn update(&self, task: &Task) -> Result<Task> {
            let mut tasks = self.tasks.write();
            if !tasks.contains_key(&task.id) {
                return Err(anyhow!("missing task {}", task.id));
            }
            tasks.insert(task.id, task.clone());
            Ok(task.clone())
        }

        async fn update_many(&self, tasks: &[Task]) -> Result<()> {
            let mut store = self.tasks.write();
            for task in tasks {
                store.insert(task.id, task.clone());
            }
            Ok(())
        }

        async fn delete(&self, id: Uuid) -> Result<()> {
            self.tasks.write().remove(&id);
            Ok(())
        }

        async fn detach_from_sprint(&self, task_ids: &[Uuid]) -> Result<()> {
            let mut tasks = self.tasks.write();
            for id in task_ids {
                if let Some(task) = tasks.get_mut(id) {
                    task.sprint_id = None;
                }
            }
            Ok(())
        }

        async fn delete_by_team(&self, team_id: Uuid) -> Result<u64> {
            let mut tasks = self.tasks.write();
            let before = tasks.len();
            tasks.retain(|_, t| t.team_id != team_id);
            Ok((before - tasks.len()) as u64)
        }
    }

    #[async_trait]
    impl SprintRepository for MockStore {
        async fn create(&self, sprint: &SprintPlan) -> Result<SprintPlan> {
            self.sprints.write().insert(sprint.id, sprint.clone());
            Ok(sprint.clone())
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<SprintPlan>> {
            Ok(self.sprints.read().get(&id).cloned())
        }

        async fn list_by_team(&self, team_id: Uuid) -> Result<Vec<SprintPlan>> {
            let mut sprints: Vec<SprintPlan> = self
                .sprints
                .read()
                .values()
                .filter(|s| s.team_id == team_id)
                .cloned()
                .collect();
            sprints.sort_by(|a, b| b.start_date.cmp(&a.start_date));
            Ok(sprints)
        }

        async fn update(&self, sprint: &SprintPlan) -> Result<SprintPlan> {
            self.sprints.write().insert(sprint.id, sprint.clone());
            Ok(sprint.clone())
        }

        async fn activate(&self, sprint_id: Uuid, updated_at: DateTime<Utc>) -> Result<bool> {
            let mut sprints = self.sprints.write();
            let team_id = match sprints.get(&sprint_id) {
                Some(s) if s.status == SprintStatus::Planned => s.team_id,
                _ => return Ok(false),
            };
            if sprints
                .values()
                .any(|s| s.team_id == team_id && s.status == SprintStatus::Active)
            {
                return Ok(false);
            }
            if let Some(sprint) = sprints.get_mut(&sprint_id) {
                sprint.status = SprintStatus::Active;
                sprint.updated_at = updated_at;
            }
            Ok(true)
        }

        async fn delete(&self, id: Uuid) -> Result<()> {
            self.sprints.write().remove(&id);
            Ok(())
        }

        async fn delete_by_team(&self, team_id: Uuid) -> Result<u64> {
            let mut sprints = self.sprints.write();
            let before = sprints.len();
            sprints.retain(|_, s| s.team_id != team_id);
            Ok((before - sprints.len()) as u64)
        }
    }

    #[async_trait]
    impl EventRepository for MockStore {
        async fn create(&self, event: &CalendarEvent) -> Result<CalendarEvent> {
            self.events.write().insert(event.id, event.clone());
            Ok(event.clone())
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<CalendarEvent>> {
            Ok(self.events.read().get(&id).cloned())
        }

        async fn list_in_window(
            &self,
            team_id: Uuid,
            from: DateTime<Utc>,
            to: DateTime<Utc>,
        ) -> Result<Vec<CalendarEvent>> {
            let mut events: Vec<CalendarEvent> = self
                .events
                .read()
                .values()
                .filter(|e| e.team_id == team_id && e.starts_at < to && e.ends_at >= from)
                .cloned()
                .collect();
            events.sort_by_key(|e| e.starts_at);
            Ok(events)
        }

        async fn update(&self, event: &CalendarEvent) -> Result<CalendarEvent> {
            self.events.write().insert(event.id, event.clone());
            Ok(event.clone())
        }

        async fn delete(&self, id: Uuid) -> Result<()> {
            self.events.write().remove(&id);
            Ok(())
        }

        async fn delete_by_team(&self, team_id: Uuid) -> Result<u64> {
            let mut events = self.events.write();
            let before = events.len();
            events.retain(|_, e| e.team_id != team_id);
            Ok((before - events.len()) as u64)
        }
    }

    #[async_trait]
    impl NoteRepository for MockStore {
        async fn create(&self, note: &Note) -> Result<Note> {
            self.notes.write().insert(note.id, note.clone());
            Ok(note.clone())
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<Note>> {
            Ok(self.notes.read().get(&id).cloned())
        }

        async fn list_by_team(&self, team_id: Uuid) -> Result<Vec<Note>> {
            let mut notes: Vec<Note> = self
                .notes
                .read()
                .values()
                .filter(|n| n.team_id == team_id)
                .cloned()
                .collect();
            notes.sort_by(|a, b| b.pinned.cmp(&a.pinned).then(b.updated_at.cmp(&a.updated_at)));
            Ok(notes)
        }

        async fn update(&self, note: &Note) -> Result<Note> {
            self.notes.write().insert(note.id, note.clone());
            Ok(note.clone())
        }

        async fn delete(&self, id: Uuid) -> Result<()> {
            self.notes.write().remove(&id);
            Ok(())
        }

        async fn delete_by_team(&self, team_id: Uuid) -> Result<u64> {
            let mut notes = self.notes.write();
            let before = notes.len();
            notes.retain(|_, n| n.team_id != team_id);
            Ok((before - notes.len()) as u64)
        }
    }

    #[async_trait]
    impl NotificationRepository for MockStore {
        async fn create(&self, notification: &Notification) -> Result<Notification> {
            self.notifications
                .write()
                .insert(notification.id, notification.clone());
            Ok(notification.clone())
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<Notification>> {
            Ok(self.notifications.read().get(&id).cloned())
        }

        async fn list_for_user(
            &self,
            user_id: Uuid,
            unread_only: bool,
            limit: u64,
            offset: u64,
        ) -> Result<Vec<Notification>> {
            let mut items: Vec<Notification> = self
                .notifications
                .read()
                .values()
                .filter(|n| n.user_id == user_id && (!unread_only || n.read_at.is_none()))
                .cloned()
                .collect();
            items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            Ok(items
                .into_iter()
                .skip(offset as usize)
                .take(limit as usize)
                .collect())
        }

        async fn count_for_user(&self, user_id: Uuid, unread_only: bool) -> Result<u64> {
            Ok(self
                .notifications
                .read()
                .values()
                .filter(|n| n.user_id == user_id && (!unread_only || n.read_at.is_none()))
                .count() as u64)
        }

        async fn mark_read(&self, id: Uuid, at: DateTime<Utc>) -> Result<()> {
            if let Some(n) = self.notifications.write().get_mut(&id) {
                n.read_at.get_or_insert(at);
            }
            Ok(())
        }

        async fn mark_all_read(&self, user_id: Uuid, at: DateTime<Utc>) -> Result<u64> {
            let mut count = 0;
            for n in self.notifications.write().values_mut() {
                if n.user_id == user_id && n.read_at.is_none() {
                    n.read_at = Some(at);
                    count += 1;
                }
            }
            Ok(count)
        }

        async fn delete(&self, id: Uuid) -> Result<()> {
            self.notifications.write().remove(&id);
            Ok(())
        }
    }
}

pub struct TestEnv {
    pub service: Service,
    pub store: Arc<mocks::MockStore>,
    pub identity: Arc<MockIdentity>,
    pub sink: Arc<RecordingSink>,
}

pub fn create_test_service() -> TestEnv {
    let store = mocks::MockStore::new();
    let identity = MockIdentity::new();
    let sink = Arc::new(RecordingSink::default());
    let service = Service::new(
        store.repositories(),
        identity.clone(),
        sink.clone(),
        Config::default(),
    );
    TestEnv {
        service,
        store,
        identity,
        sink,
    }
}
