//! Records movements: a location status change plus its audit log entry.

use huecos_core::error::CoreError;
use huecos_core::location::validate_location_code;
use huecos_core::movement::{clamp_history_limit, validate_cart_barcode};

use crate::models::movement::{
    MovementFilter, MovementLog, NewMovement, RecordMovement, RecordedMovement,
};
use crate::store::MovementOutcome;
use crate::{Store, StoreError};

/// Appends to the movement log. There is intentionally no update or delete.
pub struct MovementRecorder;

impl MovementRecorder {
    /// Set the location's status and append the log entry, as one unit.
    ///
    /// - Unknown location codes are rejected with `NotFound` and nothing is written.
    /// - A `request_id` seen before returns the stored entry with `replayed = true`,
    ///   or `Conflict` if that entry is for a different cart, location or status.
    pub async fn record(
        store: &dyn Store,
        input: &RecordMovement,
    ) -> Result<RecordedMovement, StoreError> {
        let movement = NewMovement {
            cart_barcode: validate_cart_barcode(&input.cart_barcode)?,
            location_code: validate_location_code(&input.location_code)?,
            status: input.status,
            request_id: input.request_id,
        };

        match store.apply_movement(&movement).await? {
            MovementOutcome::Applied { location, movement } => {
                tracing::info!(
                    movement_id = movement.id,
                    cart = %movement.cart_barcode,
                    location = %movement.location_code,
                    status = %movement.status,
                    "Movement recorded",
                );
                Ok(RecordedMovement {
                    movement,
                    location: Some(location),
                    replayed: false,
                })
            }
            MovementOutcome::Replayed(existing) => {
                tracing::info!(
                    movement_id = existing.id,
                    request_id = ?existing.request_id,
                    "Movement replayed, nothing written",
                );
                let location = store.find_location(&existing.location_code).await?;
                Ok(RecordedMovement {
                    movement: existing,
                    location,
                    replayed: true,
                })
            }
            MovementOutcome::RequestIdConflict(existing) => {
                tracing::warn!(
                    movement_id = existing.id,
                    request_id = ?existing.request_id,
                    cart = %movement.cart_barcode,
                    location = %movement.location_code,
                    "Movement rejected: request_id already used for a different movement",
                );
                Err(CoreError::Conflict(format!(
                    "request_id {} was already used for a different movement",
                    existing.request_id.map(|id| id.to_string()).unwrap_or_default(),
                ))
                .into())
            }
            MovementOutcome::LocationNotFound => {
                tracing::warn!(
                    location = %movement.location_code,
                    cart = %movement.cart_barcode,
                    "Movement rejected: unknown location",
                );
                Err(CoreError::not_found("Location", &movement.location_code).into())
            }
        }
    }

    /// Movement log entries, newest first.
    pub async fn history(
        store: &dyn Store,
        filter: &MovementFilter,
    ) -> Result<Vec<MovementLog>, StoreError> {
        let location_code = filter
            .location_code
            .as_deref()
            .map(str::trim)
            .filter(|code| !code.is_empty());
        let limit = clamp_history_limit(filter.limit);
        Ok(store.list_movements(location_code, limit).await?)
    }
}
