use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "ai_usage_logs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub user_id: Uuid,

    pub provider: String,

    pub model: String,

    pub feature: String,

    pub input_tokens: i64,

    pub output_tokens: i64,

    /// USD x 1_000_000
    pub cost_micros: i64,

    /// "user" or "system"
    pub key_source: String,

    pub success: bool,

    #[sea_orm(column_type = "Text", nullable)]
    pub error: Option<String>,

    pub latency_ms: i64,

    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
