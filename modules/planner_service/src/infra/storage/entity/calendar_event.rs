use sea_orm::entity::prelude::*;

/// Calendar events table entity
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "calendar_events")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub team_id: Uuid,

    pub title: String,

    pub description: Option<String>,

    pub starts_at: DateTimeUtc,

    pub ends_at: DateTimeUtc,

    pub all_day: bool,

    pub location: Option<String>,

    pub created_by: Uuid,

    /// JSON array of user ids
    pub attendee_ids: Json,

    pub task_id: Option<Uuid>,

    pub created_at: DateTimeUtc,

    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
