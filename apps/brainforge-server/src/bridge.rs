//! Cross-module adapters
//!
//! Modules only know their own event traits; these adapters route the
//! events to the modules that react to them.

use async_trait::async_trait;
use identity_service::domain::{IdentityEvent, IdentityEventPublisher};
use identity_service::{IdentityApi, IdentityError};
use ideation_service::domain::{IdeationEvent, IdeationEventSink};
use ideation_service::{IdeationApi, IdeationError};
use planner_service::domain::{PlannerEvent, PlannerEventSink};
use planner_service::{NewNotification, NotificationApi, PlannerApi};
use realtime_hub::{RealtimeApi, RealtimeError, Room, RoomAuthorizer};
use settings_service::domain::{SettingsEvent, SettingsEventPublisher};
use std::sync::{Arc, OnceLock};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

const IDENTITY_QUEUE: usize = 256;

// ===== Planner / ideation change events -> realtime rooms =====

pub struct RealtimeSink {
    realtime: Arc<dyn RealtimeApi>,
}

impl RealtimeSink {
    pub fn new(realtime: Arc<dyn RealtimeApi>) -> Self {
        Self { realtime }
    }

    fn forward(&self, room: &str, name: &str, payload: serde_json::Value) -> anyhow::Result<()> {
        let room = Room::parse(room).ok_or_else(|| anyhow::anyhow!("event for unknown room '{}'", room))?;
        let receivers = self.realtime.publish(room, name, payload);
        tracing::trace!(room = %room, event = name, receivers, "forwarded change event");
        Ok(())
    }
}

#[async_trait]
impl PlannerEventSink for RealtimeSink {
    async fn publish(&self, event: PlannerEvent) -> anyhow::Result<()> {
        self.forward(&event.room(), &event.name(), serde_json::to_value(&event)?)
    }
}

#[async_trait]
impl IdeationEventSink for RealtimeSink {
    async fn publish(&self, event: IdeationEvent) -> anyhow::Result<()> {
        self.forward(&event.room(), &event.name(), serde_json::to_value(&event)?)
    }
}

// ===== Settings events -> audit log =====

pub struct AuditLogPublisher;

#[async_trait]
impl SettingsEventPublisher for AuditLogPublisher {
    async fn publish(&self, event: SettingsEvent) -> anyhow::Result<()> {
        tracing::info!(target: "audit", event = event.name(), key = event.key(), "system setting changed");
        Ok(())
    }
}

// ===== Identity events -> notifications, realtime, purge =====

/// Queues identity events for the bridge task.
///
/// Identity is built before the modules that react to its events, so
/// delivery goes through a channel instead of direct references.
pub struct IdentityEventRelay {
    tx: mpsc::Sender<IdentityEvent>,
}

impl IdentityEventRelay {
    pub fn channel() -> (Self, mpsc::Receiver<IdentityEvent>) {
        let (tx, rx) = mpsc::channel(IDENTITY_QUEUE);
        (Self { tx }, rx)
    }
}

#[async_trait]
impl IdentityEventPublisher for IdentityEventRelay {
    async fn publish(&self, event: IdentityEvent) -> anyhow::Result<()> {
        self.tx
            .send(event)
            .await
            .map_err(|_| anyhow::anyhow!("identity event bridge is not running"))
    }
}

/// Modules that react to identity events
#[derive(Clone)]
pub struct IdentityTargets {
    pub notifications: Arc<dyn NotificationApi>,
    pub planner: Arc<dyn PlannerApi>,
    pub ideation: Arc<dyn IdeationApi>,
    pub realtime: Arc<dyn RealtimeApi>,
}

/// Drain the identity queue until cancelled
pub fn spawn_identity_bridge(
    mut rx: mpsc::Receiver<IdentityEvent>,
    targets: IdentityTargets,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        tracing::debug!("identity event bridge started");
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                event = rx.recv() => match event {
                    Some(event) => handle_identity_event(&targets, event).await,
                    None => break,
                },
            }
        }
        tracing::debug!("identity event bridge stopped");
    })
}

pub async fn handle_identity_event(targets: &IdentityTargets, event: IdentityEvent) {
    let team_id = event.team_id();
    let name = format!("team.{}", event.name());
    match serde_json::to_value(&event) {
        Ok(payload) => {
            targets.realtime.publish(Room::Team(team_id), &name, payload);
        }
        Err(e) => tracing::warn!(error = %e, "failed to encode identity event"),
    }

    match event {
        IdentityEvent::MemberJoined { .. } => {}
        IdentityEvent::MemberRemoved {
            user_id, removed_by, ..
        } => {
            if user_id != removed_by {
                notify(
                    targets,
                    NewNotification {
                        user_id,
                        kind: "team_removed".to_string(),
                        title: "You were removed from a team".to_string(),
                        body: String::new(),
                        link: None,
                    },
                )
                .await;
            }
        }
        IdentityEvent::InvitationCreated {
            team_name,
            invitee_id: Some(invitee_id),
            ..
        } => {
            notify(
                targets,
                NewNotification {
                    user_id: invitee_id,
                    kind: "team_invitation".to_string(),
                    title: format!("You are invited to join {}", team_name),
                    body: String::new(),
                    link: Some("/invitations".to_string()),
                },
            )
            .await;
        }
        IdentityEvent::InvitationCreated { .. } => {}
        IdentityEvent::TeamDeleted { team_id, .. } => {
            if let Err(e) = targets.planner.purge_team(team_id).await {
                tracing::error!(team_id = %team_id, error = %e, "planner purge failed");
            }
            if let Err(e) = targets.ideation.purge_team(team_id).await {
                tracing::error!(team_id = %team_id, error = %e, "ideation purge failed");
            }
            tracing::info!(team_id = %team_id, "team data purged");
        }
    }
}

async fn notify(targets: &IdentityTargets, notification: NewNotification) {
    let user_id = notification.user_id;
    if let Err(e) = targets.notifications.notify(notification).await {
        tracing::warn!(user_id = %user_id, error = %e, "failed to store notification");
    }
}

// ===== Room access =====

/// Room checks backed by team membership.
///
/// Session rooms resolve their team through ideation, which is built after
/// the realtime hub; `attach_ideation` completes the wiring.
pub struct MembershipAuthorizer {
    identity: Arc<dyn IdentityApi>,
    ideation: OnceLock<Arc<dyn IdeationApi>>,
}

impl MembershipAuthorizer {
    pub fn new(identity: Arc<dyn IdentityApi>) -> Self {
        Self {
            identity,
            ideation: OnceLock::new(),
        }
    }

    pub fn attach_ideation(&self, ideation: Arc<dyn IdeationApi>) {
        if self.ideation.set(ideation).is_err() {
            tracing::warn!("ideation client attached twice; keeping the first");
        }
    }

    async fn require_member(&self, team_id: Uuid, user_id: Uuid) -> Result<(), RealtimeError> {
        match self.identity.require_member(team_id, user_id).await {
            Ok(_) => Ok(()),
            Err(IdentityError::NotFound { .. }) => Err(RealtimeError::not_found("team", team_id)),
            Err(IdentityError::Forbidden { reason }) => Err(RealtimeError::forbidden(reason)),
            Err(e) => {
                tracing::error!(error = %e, "membership check failed");
                Err(RealtimeError::Internal)
            }
        }
    }

    async fn session_team(&self, session_id: Uuid) -> Result<Uuid, RealtimeError> {
        let ideation = self.ideation.get().ok_or_else(|| {
            tracing::error!("session room requested before ideation was attached");
            RealtimeError::Internal
        })?;
        match ideation.session_team(session_id).await {
            Ok(team_id) => Ok(team_id),
            Err(IdeationError::NotFound { .. }) => Err(RealtimeError::not_found("brainstorm session", session_id)),
            Err(e) => {
                tracing::error!(error = %e, "session lookup failed");
                Err(RealtimeError::Internal)
            }
        }
    }
}

#[async_trait]
impl RoomAuthorizer for MembershipAuthorizer {
    async fn authorize(&self, room: Room, user_id: Uuid) -> Result<(), RealtimeError> {
        match room {
            Room::Team(team_id) | Room::Board(team_id) => self.require_member(team_id, user_id).await,
            Room::Session(session_id) => {
                let team_id = self.session_team(session_id).await?;
                self.require_member(team_id, user_id).await
            }
            Room::User(owner) if owner == user_id => Ok(()),
            Room::User(_) => Err(RealtimeError::forbidden("this is another user's private room")),
        }
    }

    async fn display_name(&self, user_id: Uuid) -> Option<String> {
        self.identity.get_user(user_id).await.ok().map(|user| user.display_name)
    }
}
