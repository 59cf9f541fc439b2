//! Movement log model and DTOs.
//!
//! Movement logs are append-only: there is no update or delete DTO.

use huecos_core::error::CoreError;
use huecos_core::location::LocationStatus;
use huecos_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::location::Location;

/// One entry of the `movement_logs` audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MovementLog {
    pub id: DbId,
    pub cart_barcode: String,
    pub location_code: String,
    pub status: LocationStatus,
    pub request_id: Option<Uuid>,
    pub created_at: Timestamp,
}

#[derive(Debug, FromRow)]
pub(crate) struct MovementLogRow {
    pub id: DbId,
    pub cart_barcode: String,
    pub location_code: String,
    pub status: String,
    pub request_id: Option<Uuid>,
    pub created_at: Timestamp,
}

impl TryFrom<MovementLogRow> for MovementLog {
    type Error = CoreError;

    fn try_from(row: MovementLogRow) -> Result<Self, Self::Error> {
        Ok(Self {
            status: row.status.parse()?,
            id: row.id,
            cart_barcode: row.cart_barcode,
            location_code: row.location_code,
            request_id: row.request_id,
            created_at: row.created_at,
        })
    }
}

/// Request body for recording a movement from the scanning form.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordMovement {
    pub cart_barcode: String,
    pub location_code: String,
    pub status: LocationStatus,
    /// Client-generated id; a retry with the same id is applied only once.
    #[serde(default)]
    pub request_id: Option<Uuid>,
}

/// A validated movement, ready to be applied by a store.
#[derive(Debug, Clone)]
pub struct NewMovement {
    pub cart_barcode: String,
    pub location_code: String,
    pub status: LocationStatus,
    pub request_id: Option<Uuid>,
}

impl NewMovement {
    /// `true` when `log` records this same cart, location and status.
    pub fn is_recorded_by(&self, log: &MovementLog) -> bool {
        self.cart_barcode == log.cart_barcode
            && self.location_code == log.location_code
            && self.status == log.status
    }
}

/// Result of recording a movement.
#[derive(Debug, Clone, Serialize)]
pub struct RecordedMovement {
    pub movement: MovementLog,
    /// Current state of the location, if it still exists.
    pub location: Option<Location>,
    /// `true` when `request_id` matched an earlier movement and nothing was written.
    pub replayed: bool,
}

/// Query parameters for the movement history.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MovementFilter {
    pub location_code: Option<String>,
    pub limit: Option<i64>,
}
