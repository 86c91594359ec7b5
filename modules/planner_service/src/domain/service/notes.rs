use super::{internal, Service};
use crate::contract::{NewNote, Note, NoteFilter, NotePatch, PlannerError};
use crate::domain::events::{ChangeKind, PlannerEvent};
use crate::domain::validation::{matches_search, normalize_tags, validate_title};
use brainforge_kit::SecurityCtx;
use chrono::Utc;
use uuid::Uuid;

impl Service {
    pub async fn create_note(&self, ctx: &SecurityCtx, team_id: Uuid, new_note: NewNote) -> Result<Note, PlannerError> {
        self.member(ctx, team_id).await?;

        let title = validate_title(&new_note.title, "note")?;
        self.check_content(&new_note.content)?;
        let tags = normalize_tags(new_note.tags, self.config.max_tags)?;

        let now = Utc::now();
        let note = Note {
            id: Uuid::new_v4(),
            team_id,
            author_id: ctx.user_id,
            title,
            content: new_note.content,
            pinned: new_note.pinned,
            tags,
            created_at: now,
            updated_at: now,
        };

        let note = self.repos.notes.create(&note).await.map_err(internal)?;
        tracing::info!(note_id = %note.id, team_id = %team_id, "note created");
        self.publish_note(ctx, &note, ChangeKind::Created).await;
        Ok(note)
    }

    pub async fn get_note(&self, ctx: &SecurityCtx, note_id: Uuid) -> Result<Note, PlannerError> {
        let note = self.find_note(note_id).await?;
        self.member(ctx, note.team_id).await?;
        Ok(note)
    }

    /// Pinned notes first, then most recently updated
    pub async fn list_notes(&self, ctx: &SecurityCtx, team_id: Uuid, filter: NoteFilter) -> Result<Vec<Note>, PlannerError> {
        self.member(ctx, team_id).await?;

        let tag = filter.tag.map(|t| t.trim().to_lowercase()).filter(|t| !t.is_empty());
        Ok(self
            .repos
            .notes
            .list_by_team(team_id)
            .await
            .map_err(internal)?
            .into_iter()
            .filter(|n| tag.as_ref().is_none_or(|t| n.tags.contains(t)))
            .filter(|n| {
                filter
                    .search
                    .as_deref()
                    .is_none_or(|q| matches_search(q, &[Some(&n.title), Some(&n.content)]))
            })
            .collect())
    }

    /// Author or team owner/admin only
    pub async fn update_note(&self, ctx: &SecurityCtx, note_id: Uuid, patch: NotePatch) -> Result<Note, PlannerError> {
        let mut note = self.find_note(note_id).await?;
        self.require_author_or_manager(ctx, note.team_id, note.author_id, "note")
            .await?;

        if let Some(title) = patch.title {
            note.title = validate_title(&title, "note")?;
        }
        if let Some(content) = patch.content {
            self.check_content(&content)?;
            note.content = content;
        }
        if let Some(pinned) = patch.pinned {
            note.pinned = pinned;
        }
        if let Some(tags) = patch.tags {
            note.tags = normalize_tags(tags, self.config.max_tags)?;
        }
        note.updated_at = Utc::now();

        let note = self.repos.notes.update(&note).await.map_err(internal)?;
        self.publish_note(ctx, &note, ChangeKind::Updated).await;
        Ok(note)
    }

    /// Author or team owner/admin only
    pub async fn delete_note(&self, ctx: &SecurityCtx, note_id: Uuid) -> Result<(), PlannerError> {
        let note = self.find_note(note_id).await?;
        self.require_author_or_manager(ctx, note.team_id, note.author_id, "note")
            .await?;

        self.repos.notes.delete(note.id).await.map_err(internal)?;
        tracing::info!(note_id = %note.id, "note deleted");
        self.publish_note(ctx, &note, ChangeKind::Deleted).await;
        Ok(())
    }

    async fn find_note(&self, note_id: Uuid) -> Result<Note, PlannerError> {
        self.repos
            .notes
            .find_by_id(note_id)
            .await
            .map_err(internal)?
            .ok_or_else(|| PlannerError::not_found("note", note_id))
    }

    fn check_content(&self, content: &str) -> Result<(), PlannerError> {
        if content.chars().count() > self.config.max_body_length {
            return Err(PlannerError::validation(format!(
                "note content must be at most {} characters",
                self.config.max_body_length
            )));
        }
        Ok(())
    }

    async fn publish_note(&self, ctx: &SecurityCtx, note: &Note, change: ChangeKind) {
        self.publish(PlannerEvent::Note {
            team_id: note.team_id,
            note_id: note.id,
            change,
            actor_id: ctx.user_id,
            timestamp: Utc::now(),
        })
        .await;
    }
}
