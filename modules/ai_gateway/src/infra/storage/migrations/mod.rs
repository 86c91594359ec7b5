//! Database migrations for the AI gateway

use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250315_000001_create_user_ai_keys::Migration),
            Box::new(m20250315_000002_create_ai_usage_logs::Migration),
        ]
    }

    fn migration_table_name() -> DynIden {
        Alias::new("ai_gateway_migrations").into_iden()
    }
}

mod m20250315_000001_create_user_ai_keys {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250315_000001_create_user_ai_keys"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(UserAiKeys::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(UserAiKeys::Id).uuid().not_null().primary_key())
                        .col(ColumnDef::new(UserAiKeys::UserId).uuid().not_null())
                        .col(ColumnDef::new(UserAiKeys::Provider).string().not_null())
                        .col(ColumnDef::new(UserAiKeys::EncryptedKey).text().not_null())
                        .col(ColumnDef::new(UserAiKeys::KeyHint).string().not_null())
                        .col(ColumnDef::new(UserAiKeys::Label).string())
                        .col(ColumnDef::new(UserAiKeys::Endpoint).string())
                        .col(ColumnDef::new(UserAiKeys::IsActive).boolean().not_null().default(true))
                        .col(ColumnDef::new(UserAiKeys::IsDefault).boolean().not_null().default(false))
                        .col(ColumnDef::new(UserAiKeys::LastValidatedAt).timestamp_with_time_zone())
                        .col(ColumnDef::new(UserAiKeys::LastError).text())
                        .col(
                            ColumnDef::new(UserAiKeys::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .col(
                            ColumnDef::new(UserAiKeys::UpdatedAt)
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
                        .name("idx_user_ai_keys_user_provider")
                        .table(UserAiKeys::Table)
                        .col(UserAiKeys::UserId)
                        .col(UserAiKeys::Provider)
                        .unique()
                        .if_not_exists()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(UserAiKeys::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum UserAiKeys {
        Table,
        Id,
        UserId,
        Provider,
        EncryptedKey,
        KeyHint,
        Label,
        Endpoint,
        IsActive,
        IsDefault,
        LastValidatedAt,
        LastError,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20250315_000002_create_ai_usage_logs {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250315_000002_create_ai_usage_logs"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(AiUsageLogs::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(AiUsageLogs::Id).uuid().not_null().primary_key())
                        .col(ColumnDef::new(AiUsageLogs::UserId).uuid().not_null())
                        .col(ColumnDef::new(AiUsageLogs::Provider).string().not_null())
                        .col(ColumnDef::new(AiUsageLogs::Model).string().not_null())
                        .col(ColumnDef::new(AiUsageLogs::Feature).string().not_null())
                        .col(ColumnDef::new(AiUsageLogs::InputTokens).big_integer().not_null().default(0))
                        .col(ColumnDef::new(AiUsageLogs::OutputTokens).big_integer().not_null().default(0))
                        .col(ColumnDef::new(AiUsageLogs::CostMicros).big_integer().not_null().default(0))
                        .col(ColumnDef::new(AiUsageLogs::KeySource).string().not_null())
                        .col(ColumnDef::new(AiUsageLogs::Success).boolean().not_null())
                        .col(ColumnDef::new(AiUsageLogs::Error).text())
                        .col(ColumnDef::new(AiUsageLogs::LatencyMs).big_integer().not_null().default(0))
                        .col(
                            ColumnDef::new(AiUsageLogs::CreatedAt)
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
                        .name("idx_ai_usage_logs_user_created")
                        .table(AiUsageLogs::Table)
                        .col(AiUsageLogs::UserId)
                        .col(AiUsageLogs::CreatedAt)
                        .if_not_exists()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(AiUsageLogs::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum AiUsageLogs {
        Table,
        Id,
        UserId,
        Provider,
        Model,
        Feature,
        InputTokens,
        OutputTokens,
        CostMicros,
        KeySource,
        Success,
        Error,
        LatencyMs,
        CreatedAt,
    }
}
