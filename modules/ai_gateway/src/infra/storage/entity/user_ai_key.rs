use sea_orm::entity::prelude::*;

/// Provider keys of users, one row per (user, provider)
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "user_ai_keys")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub user_id: Uuid,

    pub provider: String,

    /// `v1:<nonce>:<ciphertext>`
    #[sea_orm(column_type = "Text")]
    pub encrypted_key: String,

    pub key_hint: String,

    pub label: Option<String>,

    pub endpoint: Option<String>,

    pub is_active: bool,

    pub is_default: bool,

    pub last_validated_at: Option<DateTimeUtc>,

    #[sea_orm(column_type = "Text", nullable)]
    pub last_error: Option<String>,

    pub created_at: DateTimeUtc,

    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
