use axum::routing::get;
use axum::Router;

use crate::handlers::locations;
use crate::state::AppState;

/// Location routes mounted at `/locations`.
///
/// ```text
/// GET    /                  -> list_locations
/// POST   /                  -> create_location (admin)
/// GET    /summary           -> location_summary
/// GET    /{id}              -> get_location
/// PUT    /{id}              -> update_location (admin)
/// DELETE /{id}              -> delete_location (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(locations::list_locations).post(locations::create_location),
        )
        .route("/summary", get(locations::location_summary))
        .route(
            "/{id}",
            get(locations::get_location)
                .put(locations::update_location)
                .delete(locations::delete_location),
        )
}
