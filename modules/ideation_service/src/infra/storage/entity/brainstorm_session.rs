use sea_orm::entity::prelude::*;

/// Brainstorm sessions table entity; ideas live in a JSON column
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "brainstorm_sessions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub team_id: Uuid,

    pub title: String,

    #[sea_orm(column_type = "Text")]
    pub topic: String,

    pub created_by: Uuid,

    pub status: String,

    pub ideas: Json,

    #[sea_orm(column_type = "Text", nullable)]
    pub ai_summary: Option<String>,

    pub created_at: DateTimeUtc,

    pub updated_at: DateTimeUtc,

    pub closed_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
