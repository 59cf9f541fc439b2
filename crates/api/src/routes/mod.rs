pub mod auth;
pub mod health;
pub mod locations;
pub mod movements;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                 login (public)
/// /auth/me                    current token identity
///
/// /locations                  list, create (admin)
/// /locations/summary          per-status counts
/// /locations/{id}             get, update (admin), delete (admin)
///
/// /movements                  record, history
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/locations", locations::router())
        .nest("/movements", movements::router())
}
