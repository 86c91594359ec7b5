//! SeaORM repositories against an in-memory SQLite database

use brainforge_kit::{db, DbModule};
use chrono::{Duration, Utc};
use ideation_service::contract::*;
use ideation_service::domain::{DiagramRepository, NoOpIdeationEventSink, SessionRepository};
use ideation_service::infra::storage::repositories::{SeaOrmDiagramRepository, SeaOrmSessionRepository};
use ideation_service::IdeationModule;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use uuid::Uuid;

use ideation_service::infra::storage::migrations::Migrator;
use sea_orm_migration::{MigrationName, MigratorTrait};
use std::collections::HashSet;

mod common;
use common::{print_test_header, MockAi, MockIdentity, MockPlanner};

async fn migrated_db() -> (Arc<DatabaseConnection>, IdeationModule) {
    let db = Arc::new(db::connect_in_memory().await.expect("sqlite connect failed"));
    let module = IdeationModule::new(
        Default::default(),
        db.clone(),
        MockIdentity::new(),
        MockPlanner::new(),
        MockAi::new(),
        Arc::new(NoOpIdeationEventSink),
    );
    module.migrate(&db).await.expect("migrations failed");
    (db, module)
}

fn session(team_id: Uuid, title: &str, age_minutes: i64) -> BrainstormSession {
    let at = Utc::now() - Duration::minutes(age_minutes);
    BrainstormSession {
        id: Uuid::new_v4(),
        team_id,
        title: title.to_string(),
        topic: "Topic".to_string(),
        created_by: Uuid::new_v4(),
        status: SessionStatus::Open,
        ideas: vec![],
        ai_summary: None,
        created_at: at,
        updated_at: at,
        closed_at: None,
    }
}

fn diagram(team_id: Uuid, title: &str, age_minutes: i64) -> Diagram {
    let at = Utc::now() - Duration::minutes(age_minutes);
    Diagram {
        id: Uuid::new_v4(),
        team_id,
        title: title.to_string(),
        kind: DiagramKind::ErDiagram,
        source: "erDiagram\n  TEAM ||--o{ TASK : owns".to_string(),
        prompt: Some("Data model".to_string()),
        created_by: Uuid::new_v4(),
        created_at: at,
        updated_at: at,
    }
}

#[tokio::test]
async fn test_migrations_are_idempotent() {
    print_test_header(
        "test_migrations_are_idempotent",
        &["Running the ideation migrator twice is a no-op the second time."],
    );

    let (db, module) = migrated_db().await;
    module.migrate(&db).await.expect("second migration run failed");
}

#[tokio::test]
async fn test_session_ideas_survive_the_json_column() {
    let (db, _module) = migrated_db().await;
    let repo = SeaOrmSessionRepository::new(db);
    let team_id = Uuid::new_v4();

    print_test_header(
        "test_session_ideas_survive_the_json_column",
        &["Ideas, authors and voters round-trip; lists are newest first."],
    );

    repo.create(&session(team_id, "older", 10)).await.expect("storage call failed");
    let mut s = repo.create(&session(team_id, "newer", 1)).await.expect("storage call failed");
    repo.create(&session(Uuid::new_v4(), "other team", 0)).await.expect("storage call failed");

    let voter = Uuid::new_v4();
    s.ideas = vec![
        Idea {
            id: Uuid::new_v4(),
            text: "Async standups".to_string(),
            author: IdeaAuthor::User(s.created_by),
            voters: vec![voter],
            created_at: Utc::now(),
        },
        Idea {
            id: Uuid::new_v4(),
            text: "Rotating demo host".to_string(),
            author: IdeaAuthor::Ai,
            voters: vec![],
            created_at: Utc::now(),
        },
    ];
    s.status = SessionStatus::Closed;
    s.closed_at = Some(Utc::now());
    s.ai_summary = Some("Two ideas".to_string());
    repo.update(&s).await.expect("storage call failed");

    let loaded = repo.find_by_id(s.id).await.expect("storage call failed").expect("session missing");
    assert_eq!(loaded.ideas.len(), 2);
    assert_eq!(loaded.ideas[0].voters, vec![voter]);
    assert_eq!(loaded.ideas[1].author, IdeaAuthor::Ai);
    assert_eq!(loaded.status, SessionStatus::Closed);
    assert_eq!(loaded.ai_summary.as_deref(), Some("Two ideas"));

    let listed = repo.list_by_team(team_id).await.expect("storage call failed");
    let titles: Vec<&str> = listed.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, vec!["newer", "older"]);

    repo.delete(s.id).await.expect("storage call failed");
    assert!(repo.find_by_id(s.id).await.expect("storage call failed").is_none());
    assert_eq!(repo.delete_by_team(team_id).await.expect("storage call failed"), 1);
}

#[tokio::test]
async fn test_diagram_repository_ordering_and_purge() {
    let (db, _module) = migrated_db().await;
    let repo = SeaOrmDiagramRepository::new(db);
    let team_id = Uuid::new_v4();

    let mut stale = repo.create(&diagram(team_id, "stale", 30)).await.expect("storage call failed");
    repo.create(&diagram(team_id, "recent", 5)).await.expect("storage call failed");
    repo.create(&diagram(Uuid::new_v4(), "elsewhere", 0)).await.expect("storage call failed");

    stale.title = "touched".to_string();
    stale.kind = DiagramKind::Gantt;
    stale.source = "gantt\n  title Q3".to_string();
    stale.updated_at = Utc::now();
    repo.update(&stale).await.expect("storage call failed");

    let listed = repo.list_by_team(team_id).await.expect("storage call failed");
    let titles: Vec<&str> = listed.iter().map(|d| d.title.as_str()).collect();
    assert_eq!(titles, vec!["touched", "recent"]);
    assert_eq!(listed[0].kind, DiagramKind::Gantt);
    assert_eq!(listed[1].prompt.as_deref(), Some("Data model"));

    assert_eq!(repo.delete_by_team(team_id).await.expect("storage call failed"), 2);
    assert!(repo.list_by_team(team_id).await.expect("storage call failed").is_empty());
}

#[tokio::test]
async fn test_fresh_database_records_each_migration_by_name() {
    print_test_header(
        "test_fresh_database_records_each_migration_by_name",
        &["Every migration lands in the bookkeeping table under its own versioned name."],
    );

    let (db, _module) = migrated_db().await;

    let declared: Vec<String> = Migrator::migrations()
        .iter()
        .map(|m| m.name().to_string())
        .collect();
    let unique: HashSet<&String> = declared.iter().collect();
    assert_eq!(unique.len(), declared.len(), "duplicate migration names: {:?}", declared);
    assert!(declared.iter().all(|name| name.starts_with("m2025")));

    let applied: Vec<String> = Migrator::get_applied_migrations(db.as_ref())
        .await
        .expect("reading applied migrations failed")
        .iter()
        .map(|m| m.name().to_string())
        .collect();
    assert_eq!(applied, declared);
}
