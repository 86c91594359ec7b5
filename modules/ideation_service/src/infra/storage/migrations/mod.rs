//! Database migrations for ideation service

use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250312_000001_create_brainstorm_sessions::Migration),
            Box::new(m20250312_000002_create_diagrams::Migration),
        ]
    }

    fn migration_table_name() -> DynIden {
        Alias::new("ideation_migrations").into_iden()
    }
}

mod m20250312_000001_create_brainstorm_sessions {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250312_000001_create_brainstorm_sessions"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(BrainstormSessions::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(BrainstormSessions::Id).uuid().not_null().primary_key())
                        .col(ColumnDef::new(BrainstormSessions::TeamId).uuid().not_null())
                        .col(ColumnDef::new(BrainstormSessions::Title).string().not_null())
                        .col(ColumnDef::new(BrainstormSessions::Topic).text().not_null())
                        .col(ColumnDef::new(BrainstormSessions::CreatedBy).uuid().not_null())
                        .col(
                            ColumnDef::new(BrainstormSessions::Status)
                                .string()
                                .not_null()
                                .default("open"),
                        )
                        .col(ColumnDef::new(BrainstormSessions::Ideas).json().not_null())
                        .col(ColumnDef::new(BrainstormSessions::AiSummary).text())
                        .col(
                            ColumnDef::new(BrainstormSessions::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .col(
                            ColumnDef::new(BrainstormSessions::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .col(ColumnDef::new(BrainstormSessions::ClosedAt).timestamp_with_time_zone())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_brainstorm_sessions_team_id")
                        .table(BrainstormSessions::Table)
                        .col(BrainstormSessions::TeamId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(BrainstormSessions::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum BrainstormSessions {
        Table,
        Id,
        TeamId,
        Title,
        Topic,
        CreatedBy,
        Status,
        Ideas,
        AiSummary,
        CreatedAt,
        UpdatedAt,
        ClosedAt,
    }
}

mod m20250312_000002_create_diagrams {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250312_000002_create_diagrams"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Diagrams::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Diagrams::Id).uuid().not_null().primary_key())
                        .col(ColumnDef::new(Diagrams::TeamId).uuid().not_null())
                        .col(ColumnDef::new(Diagrams::Title).string().not_null())
                        .col(ColumnDef::new(Diagrams::Kind).string().not_null())
                        .col(ColumnDef::new(Diagrams::Source).text().not_null())
                        .col(ColumnDef::new(Diagrams::Prompt).text())
                        .col(ColumnDef::new(Diagrams::CreatedBy).uuid().not_null())
                        .col(
                            ColumnDef::new(Diagrams::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .col(
                            ColumnDef::new(Diagrams::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_diagrams_team_id")
                        .table(Diagrams::Table)
                        .col(Diagrams::TeamId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Diagrams::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Diagrams {
        Table,
        Id,
        TeamId,
        Title,
        Kind,
        Source,
        Prompt,
        CreatedBy,
        CreatedAt,
        UpdatedAt,
    }
}
