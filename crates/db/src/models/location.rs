//! Location entity model and DTOs.

use huecos_core::error::CoreError;
use huecos_core::location::{LocationSize, LocationStatus};
use huecos_core::types::Timestamp;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A storage bin. `id` is the scanned location code and never changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    pub id: String,
    pub size: LocationSize,
    pub status: LocationStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Raw row from the `locations` table. `size` and `status` are TEXT columns.
#[derive(Debug, FromRow)]
pub(crate) struct LocationRow {
    pub id: String,
    pub size: String,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TryFrom<LocationRow> for Location {
    type Error = CoreError;

    fn try_from(row: LocationRow) -> Result<Self, Self::Error> {
        Ok(Self {
            size: row.size.parse()?,
            status: row.status.parse()?,
            id: row.id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

/// DTO for creating a location. The caller supplies the code.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateLocation {
    pub id: String,
    pub size: LocationSize,
    /// New bins start empty unless stated otherwise.
    #[serde(default = "default_status")]
    pub status: LocationStatus,
}

fn default_status() -> LocationStatus {
    LocationStatus::Empty
}

/// DTO for a partial update. The id is taken from the path and cannot change.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateLocation {
    pub size: Option<LocationSize>,
    pub status: Option<LocationStatus>,
}

impl UpdateLocation {
    /// `true` when no field would change.
    pub fn is_empty(&self) -> bool {
        self.size.is_none() && self.status.is_none()
    }
}

/// Query parameters for listing locations.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocationFilter {
    /// Case-insensitive substring of the location code.
    pub q: Option<String>,
    pub status: Option<LocationStatus>,
    pub size: Option<LocationSize>,
}

impl LocationFilter {
    /// The search term, trimmed, or `None` when blank.
    pub fn search_term(&self) -> Option<&str> {
        self.q.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }

    /// Whether `location` passes every set criterion.
    pub fn matches(&self, location: &Location) -> bool {
        if let Some(q) = self.search_term() {
            if !location.id.to_lowercase().contains(&q.to_lowercase()) {
                return false;
            }
        }
        self.status.is_none_or(|s| s == location.status)
            && self.size.is_none_or(|s| s == location.size)
    }
}

/// Number of locations in each fill status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LocationSummary {
    pub total: usize,
    pub empty: usize,
    pub half: usize,
    pub full: usize,
}

impl LocationSummary {
    /// Tally a list of locations.
    pub fn from_locations(locations: &[Location]) -> Self {
        locations
            .iter()
            .fold(Self::default(), |mut acc, location| {
                acc.total += 1;
                match location.status {
                    LocationStatus::Empty => acc.empty += 1,
                    LocationStatus::Half => acc.half += 1,
                    LocationStatus::Full => acc.full += 1,
                }
                acc
            })
    }
}
