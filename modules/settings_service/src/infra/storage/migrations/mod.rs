//! Database migrations for settings service

use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20250315_000001_create_system_settings::Migration)]
    }

    fn migration_table_name() -> DynIden {
        Alias::new("settings_migrations").into_iden()
    }
}

mod m20250315_000001_create_system_settings {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250315_000001_create_system_settings"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(SystemSettings::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(SystemSettings::Key)
                                .string_len(128)
                                .not_null()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(SystemSettings::Value).json().not_null())
                        .col(ColumnDef::new(SystemSettings::Description).text())
                        .col(ColumnDef::new(SystemSettings::Schema).json())
                        .col(
                            ColumnDef::new(SystemSettings::IsPublic)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(SystemSettings::Locked)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(ColumnDef::new(SystemSettings::UpdatedBy).uuid())
                        .col(
                            ColumnDef::new(SystemSettings::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .col(
                            ColumnDef::new(SystemSettings::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(SystemSettings::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum SystemSettings {
        Table,
        Key,
        Value,
        Description,
        Schema,
        IsPublic,
        Locked,
        UpdatedBy,
        CreatedAt,
        UpdatedAt,
    }
}
