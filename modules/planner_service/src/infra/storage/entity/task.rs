use sea_orm::entity::prelude::*;

/// Tasks table entity
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "tasks")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub team_id: Uuid,

    pub title: String,

    pub description: Option<String>,

    /// "todo", "in_progress", "review" or "done"
    pub status: String,

    pub priority: String,

    pub assignee_id: Option<Uuid>,

    pub creator_id: Uuid,

    pub sprint_id: Option<Uuid>,

    pub due_date: Option<Date>,

    pub position: i32,

    /// JSON array of strings
    pub tags: Json,

    pub created_at: DateTimeUtc,

    pub updated_at: DateTimeUtc,

    pub completed_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::sprint::Entity",
        from = "Column::SprintId",
        to = "super::sprint::Column::Id"
    )]
    Sprint,
}

impl Related<super::sprint::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sprint.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
