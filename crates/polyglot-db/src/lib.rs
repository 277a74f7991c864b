//! # polyglot-db
//!
//! Database layer for Polyglot. Everything goes through a `sqlx::AnyPool`
//! backed by SQLite:
//! - **users / personal_access_tokens**: identity store
//! - **locales**: language definitions
//! - **translations / translation_tags**: translation strings and their tag index

pub mod filter;
pub mod health;
pub mod repository;
pub mod seed;

use std::time::Duration;

use anyhow::Result;
use polyglot_common::config::DatabaseConfig;
use sqlx::any::AnyPoolOptions;
use sqlx::AnyPool;

/// Shared database state passed through Axum extractors.
#[derive(Clone)]
pub struct Database {
    pub pool: AnyPool,
}

impl Database {
    /// Connect to the configured database.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        sqlx::any::install_default_drivers();

        tracing::info!(url = %config.url, "Connecting to database...");
        let options = AnyPoolOptions::new().acquire_timeout(Duration::from_secs(10));

        // A private in-memory database lives exactly as long as its connection,
        // so the pool must hold one connection and never recycle it.
        let options = if config.is_in_memory() {
            options
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            options
                .max_connections(config.max_connections)
                .min_connections(config.min_connections)
                .after_connect(|conn, _meta| {
                    Box::pin(async move {
                        // An export holds a read cursor for as long as its client
                        // takes; under WAL that reader never blocks writers.
                        sqlx::query("PRAGMA journal_mode = WAL")
                            .execute(&mut *conn)
                            .await?;
                        sqlx::query("PRAGMA synchronous = NORMAL")
                            .execute(&mut *conn)
                            .await?;
                        Ok(())
                    })
                })
        };

        let pool = options.connect(&config.url).await?;
        tracing::info!("Connected to database");

        Ok(Self { pool })
    }

    /// Fresh in-memory database with the schema applied. Used by tests and benches.
    pub async fn in_memory() -> Result<Self> {
        let db = Self::connect(&DatabaseConfig {
            url: "sqlite::memory:".into(),
            max_connections: 1,
            min_connections: 1,
        })
        .await?;
        db.migrate().await?;
        Ok(db)
    }

    /// Run database migrations.
    pub async fn migrate(&self) -> Result<()> {
        tracing::info!("Running database migrations...");
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        tracing::info!("Migrations complete");
        Ok(())
    }
}

/// Whether a database error is a unique-constraint violation.
///
/// Uniqueness is checked before writes; this catches the race where two
/// requests pass the check together.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(|e| e.is_unique_violation())
}
