//! Postgres-backed [`Store`].

use async_trait::async_trait;
use huecos_core::error::CoreError;
use huecos_core::location::LocationSize;
use uuid::Uuid;

use super::{replay_outcome, MovementOutcome, StorageMode, Store};
use crate::models::location::{
    CreateLocation, Location, LocationFilter, LocationRow, UpdateLocation,
};
use crate::models::movement::{MovementLog, MovementLogRow, NewMovement};
use crate::models::user::{CreateUser, User};
use crate::DbPool;

/// Column lists shared across queries to avoid repetition.
const USER_COLUMNS: &str = "id, username, password_hash, name, role, created_at";
const LOCATION_COLUMNS: &str = "id, size, status, created_at, updated_at";
const MOVEMENT_COLUMNS: &str =
    "id, cart_barcode, location_code, status, request_id, created_at";

/// Convert a raw row, surfacing out-of-domain column values as decode errors.
fn decode<R, T>(row: R) -> Result<T, sqlx::Error>
where
    T: TryFrom<R, Error = CoreError>,
{
    T::try_from(row).map_err(|e| sqlx::Error::Decode(Box::new(e)))
}

/// [`Store`] over a Postgres connection pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    async fn find_movement_by_request(
        &self,
        request_id: Uuid,
    ) -> Result<Option<MovementLog>, sqlx::Error> {
        let query = format!("SELECT {MOVEMENT_COLUMNS} FROM movement_logs WHERE request_id = $1");
        sqlx::query_as::<_, MovementLogRow>(&query)
            .bind(request_id)
            .fetch_optional(&self.pool)
            .await?
            .map(decode)
            .transpose()
    }
}

#[async_trait]
impl Store for PgStore {
    fn mode(&self) -> StorageMode {
        StorageMode::Database
    }

    async fn ping(&self) -> Result<(), sqlx::Error> {
        crate::health_check(&self.pool).await
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE username = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(&self.pool)
            .await
    }

    async fn insert_user(&self, input: &CreateUser) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (username, password_hash, name, role)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (username) DO NOTHING
             RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.username)
            .bind(&input.password_hash)
            .bind(&input.name)
            .bind(&input.role)
            .fetch_optional(&self.pool)
            .await
    }

    async fn list_locations(&self, filter: &LocationFilter) -> Result<Vec<Location>, sqlx::Error> {
        // strpos instead of LIKE so '%' and '_' in the search term match literally.
        let query = format!(
            "SELECT {LOCATION_COLUMNS} FROM locations
             WHERE ($1::TEXT IS NULL OR strpos(lower(id), lower($1)) > 0)
               AND ($2::TEXT IS NULL OR status = $2)
               AND ($3::TEXT IS NULL OR size = $3)
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, LocationRow>(&query)
            .bind(filter.search_term())
            .bind(filter.status.map(|s| s.as_str()))
            .bind(filter.size.map(LocationSize::as_str))
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(decode)
            .collect()
    }

    async fn find_location(&self, id: &str) -> Result<Option<Location>, sqlx::Error> {
        let query = format!("SELECT {LOCATION_COLUMNS} FROM locations WHERE id = $1");
        sqlx::query_as::<_, LocationRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(decode)
            .transpose()
    }

    async fn insert_location(
        &self,
        input: &CreateLocation,
    ) -> Result<Option<Location>, sqlx::Error> {
        let query = format!(
            "INSERT INTO locations (id, size, status)
             VALUES ($1, $2, $3)
             ON CONFLICT (id) DO NOTHING
             RETURNING {LOCATION_COLUMNS}"
        );
        sqlx::query_as::<_, LocationRow>(&query)
            .bind(&input.id)
            .bind(input.size.as_str())
            .bind(input.status.as_str())
            .fetch_optional(&self.pool)
            .await?
            .map(decode)
            .transpose()
    }

    async fn update_location(
        &self,
        id: &str,
        input: &UpdateLocation,
    ) -> Result<Option<Location>, sqlx::Error> {
        let query = format!(
            "UPDATE locations SET
                size = COALESCE($2, size),
                status = COALESCE($3, status),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {LOCATION_COLUMNS}"
        );
        sqlx::query_as::<_, LocationRow>(&query)
            .bind(id)
            .bind(input.size.map(|s| s.as_str()))
            .bind(input.status.map(|s| s.as_str()))
            .fetch_optional(&self.pool)
            .await?
            .map(decode)
            .transpose()
    }

    async fn delete_location(&self, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM locations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn apply_movement(&self, input: &NewMovement) -> Result<MovementOutcome, sqlx::Error> {
        if let Some(request_id) = input.request_id {
            if let Some(existing) = self.find_movement_by_request(request_id).await? {
                return Ok(replay_outcome(existing, input));
            }
        }

        let mut tx = self.pool.begin().await?;

        let update = format!(
            "UPDATE locations SET status = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING {LOCATION_COLUMNS}"
        );
        let location = sqlx::query_as::<_, LocationRow>(&update)
            .bind(&input.location_code)
            .bind(input.status.as_str())
            .fetch_optional(&mut *tx)
            .await?;

        let Some(location) = location else {
            tx.rollback().await?;
            return Ok(MovementOutcome::LocationNotFound);
        };

        let insert = format!(
            "INSERT INTO movement_logs (cart_barcode, location_code, status, request_id)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (request_id) DO NOTHING
             RETURNING {MOVEMENT_COLUMNS}"
        );
        let movement = sqlx::query_as::<_, MovementLogRow>(&insert)
            .bind(&input.cart_barcode)
            .bind(&input.location_code)
            .bind(input.status.as_str())
            .bind(input.request_id)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(movement) = movement else {
            // A concurrent retry with the same request_id committed first.
            // Undo our status change and resolve against the stored entry.
            tx.rollback().await?;
            let request_id = input.request_id.ok_or(sqlx::Error::RowNotFound)?;
            let existing = self
                .find_movement_by_request(request_id)
                .await?
                .ok_or(sqlx::Error::RowNotFound)?;
            return Ok(replay_outcome(existing, input));
        };

        tx.commit().await?;

        Ok(MovementOutcome::Applied {
            location: decode(location)?,
            movement: decode(movement)?,
        })
    }

    async fn list_movements(
        &self,
        location_code: Option<&str>,
        limit: i64,
    ) -> Result<Vec<MovementLog>, sqlx::Error> {
        let query = format!(
            "SELECT {MOVEMENT_COLUMNS} FROM movement_logs
             WHERE ($1::TEXT IS NULL OR location_code = $1)
             ORDER BY created_at DESC, id DESC
             LIMIT $2"
        );
        sqlx::query_as::<_, MovementLogRow>(&query)
            .bind(location_code)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(decode)
            .collect()
    }
}
