use super::{internal, Service};
use crate::contract::{NewNotification, Notification, PlannerError};
use crate::domain::events::PlannerEvent;
use crate::domain::validation::validate_title;
use brainforge_kit::{Page, PageQuery, SecurityCtx};
use chrono::Utc;
use uuid::Uuid;

impl Service {
    /// Store a notification for a user and announce it on the user's room
    pub async fn notify(&self, new_notification: NewNotification) -> Result<Notification, PlannerError> {
        let kind = new_notification.kind.trim().to_string();
        if kind.is_empty() {
            return Err(PlannerError::validation("notification kind is required"));
        }
        let title = validate_title(&new_notification.title, "notification")?;

        let notification = Notification {
            id: Uuid::new_v4(),
            user_id: new_notification.user_id,
            kind,
            title,
            body: new_notification.body,
            link: new_notification.link,
            read_at: None,
            created_at: Utc::now(),
        };

        let notification = self
            .repos
            .notifications
            .create(&notification)
            .await
            .map_err(internal)?;
        tracing::debug!(
            notification_id = %notification.id,
            user_id = %notification.user_id,
            kind = %notification.kind,
            "notification stored"
        );

        self.publish(PlannerEvent::Notification {
            user_id: notification.user_id,
            notification_id: notification.id,
            timestamp: notification.created_at,
        })
        .await;
        Ok(notification)
    }

    /// The caller's notifications, newest first
    pub async fn list_notifications(
        &self,
        ctx: &SecurityCtx,
        unread_only: bool,
        query: PageQuery,
    ) -> Result<Page<Notification>, PlannerError> {
        let repo = &self.repos.notifications;
        let items = repo
            .list_for_user(ctx.user_id, unread_only, query.limit(), query.offset())
            .await
            .map_err(internal)?;
        let total = repo
            .count_for_user(ctx.user_id, unread_only)
            .await
            .map_err(internal)?;
        Ok(Page::new(items, total, query))
    }

    pub async fn unread_count(&self, ctx: &SecurityCtx) -> Result<u64, PlannerError> {
        self.repos
            .notifications
            .count_for_user(ctx.user_id, true)
            .await
            .map_err(internal)
    }

    /// Mark one of the caller's notifications read; already-read ones keep
    /// their original timestamp
    pub async fn mark_read(&self, ctx: &SecurityCtx, notification_id: Uuid) -> Result<Notification, PlannerError> {
        let mut notification = self.own_notification(ctx, notification_id).await?;
        if notification.read_at.is_none() {
            let now = Utc::now();
            self.repos
                .notifications
                .mark_read(notification.id, now)
                .await
                .map_err(internal)?;
            notification.read_at = Some(now);
        }
        Ok(notification)
    }

    /// Returns how many notifications were unread
    pub async fn mark_all_read(&self, ctx: &SecurityCtx) -> Result<u64, PlannerError> {
        let count = self
            .repos
            .notifications
            .mark_all_read(ctx.user_id, Utc::now())
            .await
            .map_err(internal)?;
        tracing::debug!(user_id = %ctx.user_id, count, "notifications marked read");
        Ok(count)
    }

    pub async fn delete_notification(&self, ctx: &SecurityCtx, notification_id: Uuid) -> Result<(), PlannerError> {
        let notification = self.own_notification(ctx, notification_id).await?;
        self.repos
            .notifications
            .delete(notification.id)
            .await
            .map_err(internal)
    }

    /// Other users' notifications are reported as missing
    async fn own_notification(&self, ctx: &SecurityCtx, notification_id: Uuid) -> Result<Notification, PlannerError> {
        self.repos
            .notifications
            .find_by_id(notification_id)
            .await
            .map_err(internal)?
            .filter(|n| n.user_id == ctx.user_id)
            .ok_or_else(|| PlannerError::not_found("notification", notification_id))
    }
}
