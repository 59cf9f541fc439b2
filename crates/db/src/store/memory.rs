//! In-process substitute for Postgres.
//!
//! All state sits behind a single `RwLock`. Every mutation, including the
//! two-part movement (status change plus log append), happens inside one
//! write-lock critical section, so readers never see half of it.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use huecos_core::location::{LocationSize, LocationStatus};
use huecos_core::types::DbId;
use indexmap::IndexMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{replay_outcome, MovementOutcome, StorageMode, Store};
use crate::models::location::{CreateLocation, Location, LocationFilter, UpdateLocation};
use crate::models::movement::{MovementLog, NewMovement};
use crate::models::user::{CreateUser, User};

#[derive(Debug, Default)]
struct MemoryState {
    users: IndexMap<String, User>,
    last_user_id: DbId,
    /// Keyed by location code, in creation order.
    locations: IndexMap<String, Location>,
    movements: Vec<MovementLog>,
    /// `request_id` -> index into `movements`.
    movements_by_request: HashMap<Uuid, usize>,
    last_movement_id: DbId,
}

/// In-memory [`Store`]. Data lives for the lifetime of the process only.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-populated with one location of each size and status.
    pub fn with_demo_locations() -> Self {
        let now = Utc::now();
        let demo = [
            ("U010101A1", LocationSize::Small, LocationStatus::Empty),
            ("U010102A1", LocationSize::Medium, LocationStatus::Half),
            ("U010103A1", LocationSize::Large, LocationStatus::Full),
        ];

        let mut state = MemoryState::default();
        for (id, size, status) in demo {
            state.locations.insert(
                id.to_string(),
                Location {
                    id: id.to_string(),
                    size,
                    status,
                    created_at: now,
                    updated_at: now,
                },
            );
        }

        Self {
            state: RwLock::new(state),
        }
    }
}

#[async_trait]
impl Store for MemoryStore {
    fn mode(&self) -> StorageMode {
        StorageMode::InMemory
    }

    async fn ping(&self) -> Result<(), sqlx::Error> {
        Ok(())
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, sqlx::Error> {
        Ok(self.state.read().await.users.get(username).cloned())
    }

    async fn insert_user(&self, input: &CreateUser) -> Result<Option<User>, sqlx::Error> {
        let mut state = self.state.write().await;
        if state.users.contains_key(&input.username) {
            return Ok(None);
        }

        state.last_user_id += 1;
        let user = User {
            id: state.last_user_id,
            username: input.username.clone(),
            password_hash: input.password_hash.clone(),
            name: input.name.clone(),
            role: input.role.clone(),
            created_at: Utc::now(),
        };
        state.users.insert(user.username.clone(), user.clone());
        Ok(Some(user))
    }

    async fn list_locations(&self, filter: &LocationFilter) -> Result<Vec<Location>, sqlx::Error> {
        let state = self.state.read().await;
        Ok(state
            .locations
            .values()
            .rev()
            .filter(|location| filter.matches(location))
            .cloned()
            .collect())
    }

    async fn find_location(&self, id: &str) -> Result<Option<Location>, sqlx::Error> {
        Ok(self.state.read().await.locations.get(id).cloned())
    }

    async fn insert_location(
        &self,
        input: &CreateLocation,
    ) -> Result<Option<Location>, sqlx::Error> {
        let mut state = self.state.write().await;
        if state.locations.contains_key(&input.id) {
            return Ok(None);
        }

        let now = Utc::now();
        let location = Location {
            id: input.id.clone(),
            size: input.size,
            status: input.status,
            created_at: now,
            updated_at: now,
        };
        state
            .locations
            .insert(location.id.clone(), location.clone());
        Ok(Some(location))
    }

    async fn update_location(
        &self,
        id: &str,
        input: &UpdateLocation,
    ) -> Result<Option<Location>, sqlx::Error> {
        let mut state = self.state.write().await;
        let Some(location) = state.locations.get_mut(id) else {
            return Ok(None);
        };

        if let Some(size) = input.size {
            location.size = size;
        }
        if let Some(status) = input.status {
            location.status = status;
        }
        location.updated_at = Utc::now();
        Ok(Some(location.clone()))
    }

    async fn delete_location(&self, id: &str) -> Result<bool, sqlx::Error> {
        // shift_remove keeps the remaining locations in creation order.
        Ok(self
            .state
            .write()
            .await
            .locations
            .shift_remove(id)
            .is_some())
    }

    async fn apply_movement(&self, input: &NewMovement) -> Result<MovementOutcome, sqlx::Error> {
        let mut guard = self.state.write().await;
        let state = &mut *guard;

        if let Some(request_id) = input.request_id {
            if let Some(&index) = state.movements_by_request.get(&request_id) {
                return Ok(replay_outcome(state.movements[index].clone(), input));
            }
        }

        let Some(location) = state.locations.get_mut(&input.location_code) else {
            return Ok(MovementOutcome::LocationNotFound);
        };

        let now = Utc::now();
        location.status = input.status;
        location.updated_at = now;
        let location = location.clone();

        state.last_movement_id += 1;
        let movement = MovementLog {
            id: state.last_movement_id,
            cart_barcode: input.cart_barcode.clone(),
            location_code: input.location_code.clone(),
            status: input.status,
            request_id: input.request_id,
            created_at: now,
        };
        if let Some(request_id) = input.request_id {
            state
                .movements_by_request
                .insert(request_id, state.movements.len());
        }
        state.movements.push(movement.clone());

        Ok(MovementOutcome::Applied { location, movement })
    }

    async fn list_movements(
        &self,
        location_code: Option<&str>,
        limit: i64,
    ) -> Result<Vec<MovementLog>, sqlx::Error> {
        let state = self.state.read().await;
        let limit = usize::try_from(limit).unwrap_or(0);
        Ok(state
            .movements
            .iter()
            .rev()
            .filter(|m| location_code.is_none_or(|code| m.location_code == code))
            .take(limit)
            .cloned()
            .collect())
    }
}
