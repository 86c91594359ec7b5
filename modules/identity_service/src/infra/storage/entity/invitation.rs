use sea_orm::entity::prelude::*;

/// Team invitations table entity
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "team_invitations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub team_id: Uuid,

    pub email: String,

    pub role: String,

    #[sea_orm(unique)]
    pub token: String,

    pub invited_by: Uuid,

    /// "pending", "accepted", "declined", "revoked" or "expired"
    pub status: String,

    pub expires_at: DateTimeUtc,

    pub created_at: DateTimeUtc,

    pub responded_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::team::Entity",
        from = "Column::TeamId",
        to = "super::team::Column::Id"
    )]
    Team,
}

impl Related<super::team::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Team.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
