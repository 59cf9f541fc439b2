//! Persistence for the warehouse location tracker.
//!
//! - [`store`] -- the [`Store`] trait with its Postgres and in-memory
//!   implementations, and the startup selection between them.
//! - [`repositories`] -- location CRUD, movement recording and user lookup,
//!   written against `&dyn Store`.
//! - [`models`] -- rows, DTOs and filters.

use std::time::Duration;

use huecos_core::error::CoreError;
use sqlx::postgres::PgPoolOptions;

pub mod models;
pub mod repositories;
pub mod store;

pub use store::{MemoryStore, PgStore, StorageMode, Store};

pub type DbPool = sqlx::PgPool;

/// How long startup waits for a Postgres connection before giving up.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Errors returned by repositories.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A domain-level error (validation, not found, duplicate key).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Applying the embedded migrations failed.
    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(CONNECT_TIMEOUT)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to verify the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply all pending migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}
