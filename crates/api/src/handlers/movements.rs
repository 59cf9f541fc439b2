//! Handlers for the `/movements` resource (scan a cart into a location).

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use huecos_db::models::movement::{MovementFilter, RecordMovement};
use huecos_db::repositories::MovementRecorder;

use crate::error::AppResult;
use crate::extract::{AppJson, AppQuery};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/movements
///
/// Record that a cart went into a location with a new fill status. Returns
/// 201, or 200 when `request_id` matched an earlier movement.
pub async fn record_movement(
    auth: AuthUser,
    State(state): State<AppState>,
    AppJson(input): AppJson<RecordMovement>,
) -> AppResult<impl IntoResponse> {
    let recorded = MovementRecorder::record(state.store(), &input).await?;

    tracing::debug!(
        movement_id = recorded.movement.id,
        replayed = recorded.replayed,
        user_id = auth.user_id,
        "Movement request handled",
    );

    let status = if recorded.replayed {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };
    Ok((status, Json(DataResponse { data: recorded })))
}

/// GET /api/v1/movements
///
/// Movement history, newest first. Optional `location_code` and `limit`.
pub async fn list_movements(
    _auth: AuthUser,
    State(state): State<AppState>,
    AppQuery(filter): AppQuery<MovementFilter>,
) -> AppResult<impl IntoResponse> {
    let movements = MovementRecorder::history(state.store(), &filter).await?;
    Ok(Json(DataResponse { data: movements }))
}
