//! Database bootstrap

use anyhow::Context;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};
use std::time::Duration;

/// Connect to the database named by `url` (postgres or sqlite)
pub async fn connect(url: &str, max_connections: u32) -> anyhow::Result<DatabaseConnection> {
    let mut options = ConnectOptions::new(url.to_owned());
    options
        .max_connections(max_connections)
        .connect_timeout(Duration::from_secs(10))
        .sqlx_logging(false);

    // Every pooled connection to `:memory:` would see its own empty database.
    if url.starts_with("sqlite") && url.contains(":memory:") {
        options.max_connections(1).min_connections(1);
    }

    let db = Database::connect(options)
        .await
        .with_context(|| format!("failed to connect to database ({})", redact_url(url)))?;

    tracing::info!(backend = ?db.get_database_backend(), "database connected");
    Ok(db)
}

/// Fresh in-memory SQLite database, used by storage tests
pub async fn connect_in_memory() -> anyhow::Result<DatabaseConnection> {
    connect("sqlite::memory:", 1).await
}

/// Strip credentials from a connection URL before it is logged
pub fn redact_url(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            format!("{}://***{}", &url[..scheme_end], &url[at..])
        }
        _ => url.to_string(),
    }
}
