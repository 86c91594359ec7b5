//! Database migrations for identity service

use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_users::Migration),
            Box::new(m20250301_000002_create_teams::Migration),
            Box::new(m20250301_000003_create_team_invitations::Migration),
        ]
    }

    fn migration_table_name() -> DynIden {
        Alias::new("identity_migrations").into_iden()
    }
}

mod m20250301_000001_create_users {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000001_create_users"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Users::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Users::Id).uuid().not_null().primary_key())
                        .col(ColumnDef::new(Users::Email).string().not_null().unique_key())
                        .col(ColumnDef::new(Users::DisplayName).string().not_null())
                        .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                        .col(ColumnDef::new(Users::Role).string().not_null().default("member"))
                        .col(ColumnDef::new(Users::AvatarUrl).string())
                        .col(
                            ColumnDef::new(Users::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .col(
                            ColumnDef::new(Users::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .col(ColumnDef::new(Users::LastLoginAt).timestamp_with_time_zone())
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Users::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Users {
        Table,
        Id,
        Email,
        DisplayName,
        PasswordHash,
        Role,
        AvatarUrl,
        CreatedAt,
        UpdatedAt,
        LastLoginAt,
    }
}

mod m20250301_000002_create_teams {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000002_create_teams"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Teams::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Teams::Id).uuid().not_null().primary_key())
                        .col(ColumnDef::new(Teams::Name).string().not_null())
                        .col(ColumnDef::new(Teams::Description).text())
                        .col(ColumnDef::new(Teams::OwnerId).uuid().not_null())
                        .col(
                            ColumnDef::new(Teams::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .col(
                            ColumnDef::new(Teams::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_teams_owner")
                                .from(Teams::Table, Teams::OwnerId)
                                .to(Users::Table, Users::Id)
                                .on_delete(ForeignKeyAction::Restrict),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(TeamMembers::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(TeamMembers::TeamId).uuid().not_null())
                        .col(ColumnDef::new(TeamMembers::UserId).uuid().not_null())
                        .col(ColumnDef::new(TeamMembers::Role).string().not_null())
                        .col(
                            ColumnDef::new(TeamMembers::JoinedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .primary_key(
                            Index::create()
                                .col(TeamMembers::TeamId)
                                .col(TeamMembers::UserId),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_team_members_team")
                                .from(TeamMembers::Table, TeamMembers::TeamId)
                                .to(Teams::Table, Teams::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_team_members_user")
                                .from(TeamMembers::Table, TeamMembers::UserId)
                                .to(Users::Table, Users::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_team_members_user_id")
                        .table(TeamMembers::Table)
                        .col(TeamMembers::UserId)
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(TeamMembers::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Teams::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Teams {
        Table,
        Id,
        Name,
        Description,
        OwnerId,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum TeamMembers {
        Table,
        TeamId,
        UserId,
        Role,
        JoinedAt,
    }

    #[derive(DeriveIden)]
    enum Users {
        Table,
        Id,
    }
}

mod m20250301_000003_create_team_invitations {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000003_create_team_invitations"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(TeamInvitations::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(TeamInvitations::Id)
                                .uuid()
                                .not_null()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(TeamInvitations::TeamId).uuid().not_null())
                        .col(ColumnDef::new(TeamInvitations::Email).string().not_null())
                        .col(ColumnDef::new(TeamInvitations::Role).string().not_null())
                        .col(
                            ColumnDef::new(TeamInvitations::Token)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(TeamInvitations::InvitedBy).uuid().not_null())
                        .col(ColumnDef::new(TeamInvitations::Status).string().not_null())
                        .col(
                            ColumnDef::new(TeamInvitations::ExpiresAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(TeamInvitations::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .col(
                            ColumnDef::new(TeamInvitations::RespondedAt)
                                .timestamp_with_time_zone(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_team_invitations_team")
                                .from(TeamInvitations::Table, TeamInvitations::TeamId)
                                .to(Teams::Table, Teams::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_team_invitations_email")
                        .table(TeamInvitations::Table)
                        .col(TeamInvitations::Email)
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(TeamInvitations::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum TeamInvitations {
        Table,
        Id,
        TeamId,
        Email,
        Role,
        Token,
        InvitedBy,
        Status,
        ExpiresAt,
        CreatedAt,
        RespondedAt,
    }

    #[derive(DeriveIden)]
    enum Teams {
        Table,
        Id,
    }
}
