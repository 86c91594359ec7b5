//! BrainForge API server entry point

use anyhow::{Context, Result};
use brainforge_kit::db;
use brainforge_server::app::Modules;
use brainforge_server::config::AppConfig;
use brainforge_server::telemetry;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "brainforge-server")]
#[command(about = "BrainForge project management API", long_about = None)]
struct Cli {
    /// Path to a YAML configuration file
    #[arg(short, long, env = "BRAINFORGE_CONFIG")]
    config: Option<PathBuf>,

    /// Print the effective configuration with secrets redacted and exit
    #[arg(long)]
    print_config: bool,

    /// Apply database migrations and exit
    #[arg(long)]
    migrate_only: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref())?;
    if cli.print_config {
        print!("{}", config.redacted().to_yaml()?);
        return Ok(());
    }

    telemetry::init(&config.logging)?;
    info!("Starting BrainForge server v{}", env!("CARGO_PKG_VERSION"));
    config.validate()?;

    info!(url = %db::redact_url(&config.database.url), "Connecting to database");
    let db = Arc::new(
        db::connect(&config.database.url, config.database.max_connections)
            .await
            .context("Failed to connect to database")?,
    );

    let mut modules = Modules::build(&config, db.clone())?;
    modules.migrate(&db).await?;
    if cli.migrate_only {
        info!("Migrations complete, exiting");
        return Ok(());
    }

    let cancel = CancellationToken::new();
    let background = modules.spawn_background(cancel.clone());
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            shutdown_signal().await;
            cancel.cancel();
        }
    });

    let app = modules.router(&config.server, db)?;
    let listener = tokio::net::TcpListener::bind(&config.server.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.bind_addr))?;
    info!("Listening on http://{}", config.server.bind_addr);

    let realtime = modules.realtime.service();
    let shutdown = cancel.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown.cancelled().await;
            // Open event streams would otherwise hold the server open
            realtime.close();
        })
        .await
        .context("Server error")?;

    cancel.cancel();
    for handle in background {
        if let Err(e) = handle.await {
            error!(error = %e, "Background task failed");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
