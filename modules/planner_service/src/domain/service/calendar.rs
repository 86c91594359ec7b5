use super::{internal, Service};
use crate::contract::{CalendarEvent, EventPatch, NewEvent, NewNotification, PlannerError};
use crate::domain::events::{ChangeKind, PlannerEvent};
use crate::domain::validation::{normalize_text, validate_title};
use brainforge_kit::SecurityCtx;
use chrono::{DateTime, Utc};
use uuid::Uuid;

const MAX_LOCATION_LENGTH: usize = 300;

impl Service {
    pub async fn create_event(
        &self,
        ctx: &SecurityCtx,
        team_id: Uuid,
        new_event: NewEvent,
    ) -> Result<CalendarEvent, PlannerError> {
        self.member(ctx, team_id).await?;

        let title = validate_title(&new_event.title, "event")?;
        let description = normalize_text(new_event.description, self.config.max_body_length)?;
        let location = normalize_text(new_event.location, MAX_LOCATION_LENGTH)?;
        validate_window(new_event.starts_at, new_event.ends_at)?;
        let attendee_ids = self.check_attendees(team_id, new_event.attendee_ids).await?;
        if let Some(task_id) = new_event.task_id {
            self.check_linked_task(team_id, task_id).await?;
        }

        let now = Utc::now();
        let event = CalendarEvent {
            id: Uuid::new_v4(),
            team_id,
            title,
            description,
            starts_at: new_event.starts_at,
            ends_at: new_event.ends_at,
            all_day: new_event.all_day,
            location,
            created_by: ctx.user_id,
            attendee_ids,
            task_id: new_event.task_id,
            created_at: now,
            updated_at: now,
        };

        let event = self.repos.events.create(&event).await.map_err(internal)?;
        tracing::info!(event_id = %event.id, team_id = %team_id, "calendar event created");

        self.invite_attendees(ctx, &event, &event.attendee_ids).await;
        self.publish_calendar(ctx, &event, ChangeKind::Created).await;
        Ok(event)
    }

    pub async fn get_event(&self, ctx: &SecurityCtx, event_id: Uuid) -> Result<CalendarEvent, PlannerError> {
        let event = self.find_event(event_id).await?;
        self.member(ctx, event.team_id).await?;
        Ok(event)
    }

    /// Events overlapping `[from, to)`, ordered by start
    pub async fn list_events(
        &self,
        ctx: &SecurityCtx,
        team_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<CalendarEvent>, PlannerError> {
        self.member(ctx, team_id).await?;
        if from >= to {
            return Err(PlannerError::validation("'from' must be before 'to'"));
        }

        Ok(self
            .repos
            .events
            .list_in_window(team_id, from, to)
            .await
            .map_err(internal)?
            .into_iter()
            .filter(|e| e.overlaps(from, to))
            .collect())
    }

    /// Creator or team owner/admin only
    pub async fn update_event(
        &self,
        ctx: &SecurityCtx,
        event_id: Uuid,
        patch: EventPatch,
    ) -> Result<CalendarEvent, PlannerError> {
        let mut event = self.find_event(event_id).await?;
        self.require_author_or_manager(ctx, event.team_id, event.created_by, "event")
            .await?;

        if let Some(title) = patch.title {
            event.title = validate_title(&title, "event")?;
        }
        if let Some(description) = patch.description {
            event.description = normalize_text(description, self.config.max_body_length)?;
        }
        if let Some(starts_at) = patch.starts_at {
            event.starts_at = starts_at;
        }
        if let Some(ends_at) = patch.ends_at {
            event.ends_at = ends_at;
        }
        validate_window(event.starts_at, event.ends_at)?;
        if let Some(all_day) = patch.all_day {
            event.all_day = all_day;
        }
        if let Some(location) = patch.location {
            event.location = normalize_text(location, MAX_LOCATION_LENGTH)?;
        }
        if let Some(task_id) = patch.task_id {
            if let Some(task_id) = task_id {
                self.check_linked_task(event.team_id, task_id).await?;
            }
            event.task_id = task_id;
        }

        let mut added = Vec::new();
        if let Some(attendee_ids) = patch.attendee_ids {
            let attendee_ids = self.check_attendees(event.team_id, attendee_ids).await?;
            added = attendee_ids
                .iter()
                .filter(|id| !event.attendee_ids.contains(id))
                .copied()
                .collect();
            event.attendee_ids = attendee_ids;
        }
        event.updated_at = Utc::now();

        let event = self.repos.events.update(&event).await.map_err(internal)?;
        self.invite_attendees(ctx, &event, &added).await;
        self.publish_calendar(ctx, &event, ChangeKind::Updated).await;
        Ok(event)
    }

    /// Creator or team owner/admin only
    pub async fn delete_event(&self, ctx: &SecurityCtx, event_id: Uuid) -> Result<(), PlannerError> {
        let event = self.find_event(event_id).await?;
        self.require_author_or_manager(ctx, event.team_id, event.created_by, "event")
            .await?;

        self.repos.events.delete(event.id).await.map_err(internal)?;
        tracing::info!(event_id = %event.id, "calendar event deleted");
        self.publish_calendar(ctx, &event, ChangeKind::Deleted).await;
        Ok(())
    }

    // ===== Helpers =====

    async fn find_event(&self, event_id: Uuid) -> Result<CalendarEvent, PlannerError> {
        self.repos
            .events
            .find_by_id(event_id)
            .await
            .map_err(internal)?
            .ok_or_else(|| PlannerError::not_found("calendar event", event_id))
    }

    /// Dedupe attendees and require team membership for each
    async fn check_attendees(&self, team_id: Uuid, attendee_ids: Vec<Uuid>) -> Result<Vec<Uuid>, PlannerError> {
        let mut out: Vec<Uuid> = Vec::with_capacity(attendee_ids.len());
        for user_id in attendee_ids {
            if out.contains(&user_id) {
                continue;
            }
            self.require_team_user(team_id, user_id, "attendee").await?;
            out.push(user_id);
        }
        Ok(out)
    }

    async fn check_linked_task(&self, team_id: Uuid, task_id: Uuid) -> Result<(), PlannerError> {
        let task = self.find_task(task_id).await?;
        if task.team_id != team_id {
            return Err(PlannerError::validation(format!(
                "task {} does not belong to this team",
                task_id
            )));
        }
        Ok(())
    }

    async fn invite_attendees(&self, ctx: &SecurityCtx, event: &CalendarEvent, attendee_ids: &[Uuid]) {
        for user_id in attendee_ids.iter().filter(|id| **id != ctx.user_id) {
            let notification = NewNotification {
                user_id: *user_id,
                kind: "event_invite".to_string(),
                title: "You were invited to an event".to_string(),
                body: format!("{} ({})", event.title, event.starts_at.format("%Y-%m-%d %H:%M UTC")),
                link: Some(format!("/teams/{}/events/{}", event.team_id, event.id)),
            };
            if let Err(e) = self.notify(notification).await {
                tracing::warn!(event_id = %event.id, user_id = %user_id, error = %e, "failed to notify attendee");
            }
        }
    }

    async fn publish_calendar(&self, ctx: &SecurityCtx, event: &CalendarEvent, change: ChangeKind) {
        self.publish(PlannerEvent::CalendarEvent {
            team_id: event.team_id,
            event_id: event.id,
            change,
            actor_id: ctx.user_id,
            timestamp: Utc::now(),
        })
        .await;
    }
}

/// Zero-length events are allowed, reversed ones are not
fn validate_window(starts_at: DateTime<Utc>, ends_at: DateTime<Utc>) -> Result<(), PlannerError> {
    if ends_at < starts_at {
        return Err(PlannerError::validation("event must not end before it starts"));
    }
    Ok(())
}
