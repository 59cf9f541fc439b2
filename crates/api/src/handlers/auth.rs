//! Handlers for the `/auth` resource.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use crate::auth::gate::{authenticate, AuthOutcome};
use crate::error::AppResult;
use crate::extract::AppJson;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// POST /api/v1/auth/login
///
/// Authenticate with username + password. Returns a bearer token.
pub async fn login(
    State(state): State<AppState>,
    AppJson(input): AppJson<LoginRequest>,
) -> AppResult<Json<AuthOutcome>> {
    let outcome = authenticate(
        state.store(),
        &state.config.jwt,
        state.config.offline_admin.as_ref(),
        &input.username,
        &input.password,
    )
    .await?;

    Ok(Json(outcome))
}

/// GET /api/v1/auth/me
///
/// The identity carried by the presented token.
pub async fn me(auth: AuthUser) -> Json<DataResponse<AuthUser>> {
    Json(DataResponse { data: auth })
}
