//! The storage accessor.
//!
//! [`Store`] has one method per statement the application issues. Two
//! implementations exist: [`PgStore`] (parameterized SQL against Postgres)
//! and [`MemoryStore`] (an in-process substitute). [`connect`] picks one at
//! startup; the choice is fixed for the life of the process and is reported
//! through [`Store::mode`].

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use huecos_core::error::CoreError;
use serde::Serialize;

use crate::models::location::{CreateLocation, Location, LocationFilter, UpdateLocation};
use crate::models::movement::{MovementLog, NewMovement};
use crate::models::user::{CreateUser, User};
use crate::StoreError;

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Which backend is serving requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageMode {
    /// Postgres is connected.
    Database,
    /// Postgres was unavailable (or disabled) and the in-memory store is active.
    InMemory,
}

impl StorageMode {
    pub fn as_str(self) -> &'static str {
        match self {
            StorageMode::Database => "database",
            StorageMode::InMemory => "in_memory",
        }
    }

    /// `true` when data will not survive a restart.
    pub fn is_degraded(self) -> bool {
        self == StorageMode::InMemory
    }
}

impl fmt::Display for StorageMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of [`Store::apply_movement`].
#[derive(Debug, Clone)]
pub enum MovementOutcome {
    /// The status was changed and the log entry appended, together.
    Applied {
        location: Location,
        movement: MovementLog,
    },
    /// A movement with the same `request_id` already exists; nothing was written.
    Replayed(MovementLog),
    /// The `request_id` belongs to a different movement; nothing was written.
    RequestIdConflict(MovementLog),
    /// No location has the given code; nothing was written.
    LocationNotFound,
}

/// Outcome for a movement whose `request_id` is already stored as `existing`.
pub(crate) fn replay_outcome(existing: MovementLog, input: &NewMovement) -> MovementOutcome {
    if input.is_recorded_by(&existing) {
        MovementOutcome::Replayed(existing)
    } else {
        MovementOutcome::RequestIdConflict(existing)
    }
}

/// Storage accessor used by every repository.
///
/// Methods return `sqlx::Error` for backend failures. "Absent" and
/// "already exists" are reported through `Option`/`bool`, never as errors,
/// so repositories decide the domain error.
#[async_trait]
pub trait Store: Send + Sync {
    /// The active backend.
    fn mode(&self) -> StorageMode;

    /// Check the backend can serve queries.
    async fn ping(&self) -> Result<(), sqlx::Error>;

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, sqlx::Error>;

    /// Insert a user. Returns `None` if the username is taken.
    async fn insert_user(&self, input: &CreateUser) -> Result<Option<User>, sqlx::Error>;

    /// List locations matching `filter`, most recently created first.
    async fn list_locations(&self, filter: &LocationFilter) -> Result<Vec<Location>, sqlx::Error>;

    async fn find_location(&self, id: &str) -> Result<Option<Location>, sqlx::Error>;

    /// Insert a location. Returns `None` if the id is taken.
    async fn insert_location(&self, input: &CreateLocation)
        -> Result<Option<Location>, sqlx::Error>;

    /// Apply the non-`None` fields of `input`. Returns `None` if no row has `id`.
    async fn update_location(
        &self,
        id: &str,
        input: &UpdateLocation,
    ) -> Result<Option<Location>, sqlx::Error>;

    /// Physically delete a location. Returns `true` if a row was removed.
    async fn delete_location(&self, id: &str) -> Result<bool, sqlx::Error>;

    /// Set the location's status and append the movement log entry as one unit.
    async fn apply_movement(&self, input: &NewMovement) -> Result<MovementOutcome, sqlx::Error>;

    /// Movement log entries, newest first.
    async fn list_movements(
        &self,
        location_code: Option<&str>,
        limit: i64,
    ) -> Result<Vec<MovementLog>, sqlx::Error>;
}

/// Startup policy for choosing a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoragePolicy {
    /// Use Postgres when reachable, otherwise fall back to memory.
    #[default]
    Auto,
    /// Require Postgres; startup fails if it is unreachable.
    Database,
    /// Always use the in-memory store.
    Memory,
}

impl FromStr for StoragePolicy {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" | "" => Ok(Self::Auto),
            "database" | "postgres" => Ok(Self::Database),
            "memory" | "in_memory" => Ok(Self::Memory),
            other => Err(CoreError::Validation(format!(
                "Invalid storage mode '{other}'. Must be one of: auto, database, memory"
            ))),
        }
    }
}

/// Inputs to [`connect`].
#[derive(Debug, Clone, Default)]
pub struct StoreSettings {
    pub database_url: Option<String>,
    pub policy: StoragePolicy,
    /// Seed sample locations when the in-memory store is chosen.
    pub seed_demo_data: bool,
}

/// Open the store selected by `settings`.
///
/// Under [`StoragePolicy::Auto`] any failure to connect, health-check or
/// migrate is logged and answered with a [`MemoryStore`].
pub async fn connect(settings: &StoreSettings) -> Result<Arc<dyn Store>, StoreError> {
    match (settings.policy, settings.database_url.as_deref()) {
        (StoragePolicy::Memory, _) => {
            tracing::info!("In-memory storage requested");
            Ok(memory_store(settings))
        }
        (StoragePolicy::Database, None) => Err(StoreError::Core(CoreError::Validation(
            "DATABASE_URL must be set when STORAGE_MODE=database".into(),
        ))),
        (StoragePolicy::Database, Some(url)) => Ok(Arc::new(open_database(url).await?)),
        (StoragePolicy::Auto, None) => {
            tracing::warn!("DATABASE_URL not set, using in-memory storage");
            Ok(memory_store(settings))
        }
        (StoragePolicy::Auto, Some(url)) => match open_database(url).await {
            Ok(store) => Ok(Arc::new(store)),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "Database unavailable, falling back to in-memory storage for this process"
                );
                Ok(memory_store(settings))
            }
        },
    }
}

async fn open_database(url: &str) -> Result<PgStore, StoreError> {
    let pool = crate::create_pool(url).await?;
    crate::health_check(&pool).await?;
    crate::run_migrations(&pool).await?;
    tracing::info!("Database connected and migrations applied");
    Ok(PgStore::new(pool))
}

fn memory_store(settings: &StoreSettings) -> Arc<dyn Store> {
    if settings.seed_demo_data {
        tracing::info!("Seeding in-memory store with demo locations");
        Arc::new(MemoryStore::with_demo_locations())
    } else {
        Arc::new(MemoryStore::new())
    }
}
