//! # Polyglot Server
//!
//! Binary entry point for the translation-management API.
//!
//! ```text
//! polyglot [serve]   run migrations, then serve HTTP (default)
//! polyglot migrate   apply pending migrations and exit
//! polyglot seed      insert the default locales and exit
//! ```

use std::net::SocketAddr;

use clap::{Parser, Subcommand};
use polyglot_api::{build_router, AppState};
use polyglot_common::config::AppConfig;
use polyglot_db::Database;

#[derive(Debug, Parser)]
#[command(name = "polyglot", version, about = "Translation management API")]
struct Cli {
    /// Log as JSON lines instead of human-readable text
    #[arg(long, env = "POLYGLOT_LOG_JSON", global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run migrations, then serve the HTTP API
    Serve,
    /// Apply pending database migrations
    Migrate,
    /// Insert the default locales (English, French, Espanol) if missing
    Seed,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = polyglot_common::config::init()?;

    init_tracing(cli.log_json);

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config).await,
        Command::Migrate => {
            let db = Database::connect(&config.database).await?;
            db.migrate().await
        }
        Command::Seed => {
            let db = Database::connect(&config.database).await?;
            db.migrate().await?;
            let inserted = polyglot_db::seed::seed_locales(&db.pool).await?;
            tracing::info!(inserted, "Default locales seeded");
            Ok(())
        }
    }
}

/// Structured logging; `RUST_LOG` overrides the default filter.
fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "polyglot=debug,tower_http=debug".into());

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    if json {
        builder.json().init();
    } else {
        builder.with_thread_ids(true).init();
    }
}

async fn serve(config: AppConfig) -> anyhow::Result<()> {
    tracing::info!("Starting Polyglot v{}", env!("CARGO_PKG_VERSION"));

    let db = Database::connect(&config.database).await?;
    db.migrate().await?;

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);
    let router = build_router(AppState::new(db, config));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("REST API listening on http://{addr}");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, draining connections");
}
