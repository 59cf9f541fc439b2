//! Handlers for the `/locations` resource.
//!
//! Reads are open to any authenticated user; create, update and delete
//! require the admin role.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use huecos_db::models::location::{CreateLocation, LocationFilter, UpdateLocation};
use huecos_db::repositories::LocationRepo;

use crate::error::AppResult;
use crate::extract::{AppJson, AppQuery};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/locations
///
/// List locations, most recently created first. Optional `q` (code
/// substring), `status` and `size` filters.
pub async fn list_locations(
    _auth: AuthUser,
    State(state): State<AppState>,
    AppQuery(filter): AppQuery<LocationFilter>,
) -> AppResult<impl IntoResponse> {
    let locations = LocationRepo::list_filtered(state.store(), &filter).await?;
    Ok(Json(DataResponse { data: locations }))
}

/// GET /api/v1/locations/summary
pub async fn location_summary(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let summary = LocationRepo::summary(state.store()).await?;
    Ok(Json(DataResponse { data: summary }))
}

/// GET /api/v1/locations/{id}
pub async fn get_location(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let location = LocationRepo::get(state.store(), &id).await?;
    Ok(Json(DataResponse { data: location }))
}

/// POST /api/v1/locations
///
/// Create a location with a caller-supplied code. Returns 201.
pub async fn create_location(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateLocation>,
) -> AppResult<impl IntoResponse> {
    let location = LocationRepo::create(state.store(), &input).await?;

    tracing::info!(
        location = %location.id,
        size = %location.size,
        status = %location.status,
        user_id = admin.user_id,
        "Location created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: location })))
}

/// PUT /api/v1/locations/{id}
///
/// Partial update of size and/or status.
pub async fn update_location(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(input): AppJson<UpdateLocation>,
) -> AppResult<impl IntoResponse> {
    let location = LocationRepo::update(state.store(), &id, &input).await?;

    tracing::info!(
        location = %location.id,
        size = %location.size,
        status = %location.status,
        user_id = admin.user_id,
        "Location updated",
    );

    Ok(Json(DataResponse { data: location }))
}

/// DELETE /api/v1/locations/{id}
///
/// Physically delete a location. Its movement logs are kept. Returns 204.
pub async fn delete_location(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    LocationRepo::delete(state.store(), &id).await?;

    tracing::info!(location = %id.trim(), user_id = admin.user_id, "Location deleted");

    Ok(StatusCode::NO_CONTENT)
}
