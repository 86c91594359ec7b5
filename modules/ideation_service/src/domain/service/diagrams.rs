use super::{internal, Service};
use crate::contract::{Diagram, DiagramKind, DiagramPatch, IdeationError, NewDiagram};
use crate::domain::events::{ChangeKind, IdeationEvent};
use crate::domain::mermaid::check_header;
use crate::domain::validation::validate_title;
use brainforge_kit::SecurityCtx;
use chrono::Utc;
use uuid::Uuid;

impl Service {
    pub async fn create_diagram(
        &self,
        ctx: &SecurityCtx,
        team_id: Uuid,
        new_diagram: NewDiagram,
    ) -> Result<Diagram, IdeationError> {
        self.member(ctx, team_id).await?;

        let title = validate_title(&new_diagram.title)?;
        let source = self.check_source(new_diagram.kind, &new_diagram.source)?;
        self.store_diagram(ctx, team_id, title, new_diagram.kind, source, None)
            .await
    }

    /// Most recently updated first
    pub async fn list_diagrams(&self, ctx: &SecurityCtx, team_id: Uuid) -> Result<Vec<Diagram>, IdeationError> {
        self.member(ctx, team_id).await?;
        self.diagrams.list_by_team(team_id).await.map_err(internal)
    }

    pub async fn get_diagram(&self, ctx: &SecurityCtx, diagram_id: Uuid) -> Result<Diagram, IdeationError> {
        let diagram = self.find_diagram(diagram_id).await?;
        self.member(ctx, diagram.team_id).await?;
        Ok(diagram)
    }

    /// Creator or team owner/admin only
    pub async fn update_diagram(
        &self,
        ctx: &SecurityCtx,
        diagram_id: Uuid,
        patch: DiagramPatch,
    ) -> Result<Diagram, IdeationError> {
        let mut diagram = self.find_diagram(diagram_id).await?;
        self.require_creator_or_manager(ctx, diagram.team_id, diagram.created_by, "diagram")
            .await?;

        if let Some(title) = patch.title {
            diagram.title = validate_title(&title)?;
        }
        if let Some(kind) = patch.kind {
            diagram.kind = kind;
        }
        let source = patch.source.unwrap_or_else(|| diagram.source.clone());
        diagram.source = self.check_source(diagram.kind, &source)?;
        diagram.updated_at = Utc::now();

        let diagram = self.diagrams.update(&diagram).await.map_err(internal)?;
        self.publish_diagram(ctx, &diagram, ChangeKind::Updated).await;
        Ok(diagram)
    }

    /// Creator or team owner/admin only
    pub async fn delete_diagram(&self, ctx: &SecurityCtx, diagram_id: Uuid) -> Result<(), IdeationError> {
        let diagram = self.find_diagram(diagram_id).await?;
        self.require_creator_or_manager(ctx, diagram.team_id, diagram.created_by, "diagram")
            .await?;

        self.diagrams.delete(diagram.id).await.map_err(internal)?;
        tracing::info!(diagram_id = %diagram.id, "diagram deleted");
        self.publish_diagram(ctx, &diagram, ChangeKind::Deleted).await;
        Ok(())
    }

    // ===== Helpers =====

    pub(super) async fn store_diagram(
        &self,
        ctx: &SecurityCtx,
        team_id: Uuid,
        title: String,
        kind: DiagramKind,
        source: String,
        prompt: Option<String>,
    ) -> Result<Diagram, IdeationError> {
        let now = Utc::now();
        let diagram = Diagram {
            id: Uuid::new_v4(),
            team_id,
            title,
            kind,
            source,
            prompt,
            created_by: ctx.user_id,
            created_at: now,
            updated_at: now,
        };

        let diagram = self.diagrams.create(&diagram).await.map_err(internal)?;
        tracing::info!(
            diagram_id = %diagram.id,
            team_id = %team_id,
            kind = diagram.kind.as_str(),
            generated = diagram.prompt.is_some(),
            "diagram created"
        );
        self.publish_diagram(ctx, &diagram, ChangeKind::Created).await;
        Ok(diagram)
    }

    /// Trimmed source that declares `kind` and fits the size limit
    fn check_source(&self, kind: DiagramKind, source: &str) -> Result<String, IdeationError> {
        let source = source.trim();
        if source.chars().count() > self.config.max_source_length {
            return Err(IdeationError::validation(format!(
                "diagram source must be at most {} characters",
                self.config.max_source_length
            )));
        }
        check_header(kind, source).map_err(IdeationError::validation)?;
        Ok(source.to_string())
    }

    async fn find_diagram(&self, diagram_id: Uuid) -> Result<Diagram, IdeationError> {
        self.diagrams
            .find_by_id(diagram_id)
            .await
            .map_err(internal)?
            .ok_or_else(|| IdeationError::not_found("diagram", diagram_id))
    }

    async fn publish_diagram(&self, ctx: &SecurityCtx, diagram: &Diagram, change: ChangeKind) {
        self.publish(IdeationEvent::Diagram {
            team_id: diagram.team_id,
            diagram_id: diagram.id,
            change,
            actor_id: ctx.user_id,
            timestamp: Utc::now(),
        })
        .await;
    }
}
