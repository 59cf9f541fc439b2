use axum::routing::get;
use axum::Router;

use crate::handlers::movements;
use crate::state::AppState;

/// Movement routes mounted at `/movements`.
///
/// ```text
/// GET    /                  -> list_movements
/// POST   /                  -> record_movement
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/",
        get(movements::list_movements).post(movements::record_movement),
    )
}
