//! Repository for the `locations` table.

use huecos_core::error::CoreError;
use huecos_core::location::validate_location_code;

use crate::models::location::{
    CreateLocation, Location, LocationFilter, LocationSummary, UpdateLocation,
};
use crate::{Store, StoreError};

const ENTITY: &str = "Location";

/// Provides CRUD operations for locations.
pub struct LocationRepo;

impl LocationRepo {
    /// List all locations, most recently created first.
    pub async fn list(store: &dyn Store) -> Result<Vec<Location>, StoreError> {
        Self::list_filtered(store, &LocationFilter::default()).await
    }

    /// List locations matching `filter`, most recently created first.
    pub async fn list_filtered(
        store: &dyn Store,
        filter: &LocationFilter,
    ) -> Result<Vec<Location>, StoreError> {
        Ok(store.list_locations(filter).await?)
    }

    /// Find a location by code. Surrounding whitespace is ignored.
    pub async fn find_by_id(store: &dyn Store, id: &str) -> Result<Option<Location>, StoreError> {
        Ok(store.find_location(id.trim()).await?)
    }

    /// Like [`find_by_id`](Self::find_by_id) but absent is `NotFound`.
    pub async fn get(store: &dyn Store, id: &str) -> Result<Location, StoreError> {
        Self::find_by_id(store, id)
            .await?
            .ok_or_else(|| CoreError::not_found(ENTITY, id.trim()).into())
    }

    /// Create a location with a caller-supplied code.
    ///
    /// Fails with `DuplicateKey` if the code exists. The explicit lookup gives
    /// the common case a clear error; the store's own uniqueness check covers
    /// a concurrent create that slips in between.
    pub async fn create(store: &dyn Store, input: &CreateLocation) -> Result<Location, StoreError> {
        let id = validate_location_code(&input.id)?;

        if store.find_location(&id).await?.is_some() {
            return Err(duplicate(id));
        }

        let normalized = CreateLocation {
            id: id.clone(),
            ..input.clone()
        };
        store
            .insert_location(&normalized)
            .await?
            .ok_or_else(|| duplicate(id))
    }

    /// Apply a partial update. Fails with `NotFound` if the code is absent.
    pub async fn update(
        store: &dyn Store,
        id: &str,
        input: &UpdateLocation,
    ) -> Result<Location, StoreError> {
        if input.is_empty() {
            return Err(CoreError::Validation(
                "At least one of size or status must be provided".into(),
            )
            .into());
        }

        let id = id.trim();
        store
            .update_location(id, input)
            .await?
            .ok_or_else(|| CoreError::not_found(ENTITY, id).into())
    }

    /// Physically delete a location. Fails with `NotFound` if the code is absent,
    /// so a repeated delete is reported rather than silently accepted.
    pub async fn delete(store: &dyn Store, id: &str) -> Result<(), StoreError> {
        let id = id.trim();
        if !store.delete_location(id).await? {
            return Err(CoreError::not_found(ENTITY, id).into());
        }
        Ok(())
    }

    /// Count locations per fill status.
    pub async fn summary(store: &dyn Store) -> Result<LocationSummary, StoreError> {
        let locations = Self::list(store).await?;
        Ok(LocationSummary::from_locations(&locations))
    }
}

fn duplicate(id: String) -> StoreError {
    CoreError::DuplicateKey { entity: ENTITY, id }.into()
}
