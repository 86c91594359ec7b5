//! Database migrations for planner service
//!
//! Team and user ids reference the identity tables only logically; team
//! deletion is propagated through `purge_team`.

use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250310_000001_create_sprints_and_tasks::Migration),
            Box::new(m20250310_000002_create_calendar_events::Migration),
            Box::new(m20250310_000003_create_notes::Migration),
            Box::new(m20250310_000004_create_notifications::Migration),
            Box::new(m20250318_000005_one_active_sprint_per_team::Migration),
        ]
    }

    fn migration_table_name() -> DynIden {
        Alias::new("planner_migrations").into_iden()
    }
}

mod m20250310_000001_create_sprints_and_tasks {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250310_000001_create_sprints_and_tasks"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Sprints::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Sprints::Id).uuid().not_null().primary_key())
                        .col(ColumnDef::new(Sprints::TeamId).uuid().not_null())
                        .col(ColumnDef::new(Sprints::Name).string().not_null())
                        .col(ColumnDef::new(Sprints::Goal).text())
                        .col(ColumnDef::new(Sprints::StartDate).date().not_null())
                        .col(ColumnDef::new(Sprints::EndDate).date().not_null())
                        .col(ColumnDef::new(Sprints::Status).string().not_null().default("planned"))
                        .col(ColumnDef::new(Sprints::CreatedBy).uuid().not_null())
                        .col(
                            ColumnDef::new(Sprints::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .col(
                            ColumnDef::new(Sprints::UpdatedAt)
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
                        .name("idx_sprints_team_id")
                        .table(Sprints::Table)
                        .col(Sprints::TeamId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Tasks::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Tasks::Id).uuid().not_null().primary_key())
                        .col(ColumnDef::new(Tasks::TeamId).uuid().not_null())
                        .col(ColumnDef::new(Tasks::Title).string().not_null())
                        .col(ColumnDef::new(Tasks::Description).text())
                        .col(ColumnDef::new(Tasks::Status).string().not_null().default("todo"))
                        .col(ColumnDef::new(Tasks::Priority).string().not_null().default("medium"))
                        .col(ColumnDef::new(Tasks::AssigneeId).uuid())
                        .col(ColumnDef::new(Tasks::CreatorId).uuid().not_null())
                        .col(ColumnDef::new(Tasks::SprintId).uuid())
                        .col(ColumnDef::new(Tasks::DueDate).date())
                        .col(ColumnDef::new(Tasks::Position).integer().not_null().default(0))
                        .col(ColumnDef::new(Tasks::Tags).json().not_null())
                        .col(
                            ColumnDef::new(Tasks::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .col(
                            ColumnDef::new(Tasks::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .col(ColumnDef::new(Tasks::CompletedAt).timestamp_with_time_zone())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_tasks_sprint")
                                .from(Tasks::Table, Tasks::SprintId)
                                .to(Sprints::Table, Sprints::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_tasks_team_status_position")
                        .table(Tasks::Table)
                        .col(Tasks::TeamId)
                        .col(Tasks::Status)
                        .col(Tasks::Position)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_tasks_sprint_id")
                        .table(Tasks::Table)
                        .col(Tasks::SprintId)
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Tasks::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Sprints::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Sprints {
        Table,
        Id,
        TeamId,
        Name,
        Goal,
        StartDate,
        EndDate,
        Status,
        CreatedBy,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum Tasks {
        Table,
        Id,
        TeamId,
        Title,
        Description,
        Status,
        Priority,
        AssigneeId,
        CreatorId,
        SprintId,
        DueDate,
        Position,
        Tags,
        CreatedAt,
        UpdatedAt,
        CompletedAt,
    }
}

mod m20250310_000002_create_calendar_events {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250310_000002_create_calendar_events"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(CalendarEvents::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(CalendarEvents::Id)
                                .uuid()
                                .not_null()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(CalendarEvents::TeamId).uuid().not_null())
                        .col(ColumnDef::new(CalendarEvents::Title).string().not_null())
                        .col(ColumnDef::new(CalendarEvents::Description).text())
                        .col(
                            ColumnDef::new(CalendarEvents::StartsAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(CalendarEvents::EndsAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(CalendarEvents::AllDay)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(ColumnDef::new(CalendarEvents::Location).string())
                        .col(ColumnDef::new(CalendarEvents::CreatedBy).uuid().not_null())
                        .col(ColumnDef::new(CalendarEvents::AttendeeIds).json().not_null())
                        .col(ColumnDef::new(CalendarEvents::TaskId).uuid())
                        .col(
                            ColumnDef::new(CalendarEvents::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .col(
                            ColumnDef::new(CalendarEvents::UpdatedAt)
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
                        .name("idx_calendar_events_team_starts_at")
                        .table(CalendarEvents::Table)
                        .col(CalendarEvents::TeamId)
                        .col(CalendarEvents::StartsAt)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(CalendarEvents::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum CalendarEvents {
        Table,
        Id,
        TeamId,
        Title,
        Description,
        StartsAt,
        EndsAt,
        AllDay,
        Location,
        CreatedBy,
        AttendeeIds,
        TaskId,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20250310_000003_create_notes {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250310_000003_create_notes"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Notes::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Notes::Id).uuid().not_null().primary_key())
                        .col(ColumnDef::new(Notes::TeamId).uuid().not_null())
                        .col(ColumnDef::new(Notes::AuthorId).uuid().not_null())
                        .col(ColumnDef::new(Notes::Title).string().not_null())
                        .col(ColumnDef::new(Notes::Content).text().not_null())
                        .col(ColumnDef::new(Notes::Pinned).boolean().not_null().default(false))
                        .col(ColumnDef::new(Notes::Tags).json().not_null())
                        .col(
                            ColumnDef::new(Notes::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .col(
                            ColumnDef::new(Notes::UpdatedAt)
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
                        .name("idx_notes_team_id")
                        .table(Notes::Table)
                        .col(Notes::TeamId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Notes::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Notes {
        Table,
        Id,
        TeamId,
        AuthorId,
        Title,
        Content,
        Pinned,
        Tags,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20250310_000004_create_notifications {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250310_000004_create_notifications"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Notifications::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Notifications::Id)
                                .uuid()
                                .not_null()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Notifications::UserId).uuid().not_null())
                        .col(ColumnDef::new(Notifications::Kind).string().not_null())
                        .col(ColumnDef::new(Notifications::Title).string().not_null())
                        .col(ColumnDef::new(Notifications::Body).text().not_null())
                        .col(ColumnDef::new(Notifications::Link).string())
                        .col(ColumnDef::new(Notifications::ReadAt).timestamp_with_time_zone())
                        .col(
                            ColumnDef::new(Notifications::CreatedAt)
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
                        .name("idx_notifications_user_created")
                        .table(Notifications::Table)
                        .col(Notifications::UserId)
                        .col(Notifications::CreatedAt)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Notifications::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Notifications {
        Table,
        Id,
        UserId,
        Kind,
        Title,
        Body,
        Link,
        ReadAt,
        CreatedAt,
    }
}

mod m20250318_000005_one_active_sprint_per_team {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250318_000005_one_active_sprint_per_team"
        }
    }

    // Partial unique index; both SQLite and PostgreSQL accept this form
    const CREATE: &str = "CREATE UNIQUE INDEX IF NOT EXISTS idx_sprints_one_active_per_team \
                          ON sprints (team_id) WHERE status = 'active'";
    const DROP: &str = "DROP INDEX IF EXISTS idx_sprints_one_active_per_team";

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager.get_connection().execute_unprepared(CREATE).await?;
            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager.get_connection().execute_unprepared(DROP).await?;
            Ok(())
        }
    }
}
