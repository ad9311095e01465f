//! Route definitions for the `/countries` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::countries;
use crate::state::AppState;

/// Country routes.
///
/// ```text
/// GET    /countries                -> list_countries
/// POST   /countries/refresh        -> refresh_countries
/// GET    /countries/image          -> get_summary_image
/// GET    /countries/{name}         -> get_country
/// DELETE /countries/{name}         -> delete_country
/// ```
///
/// Static segments win over `{name}`, so `/countries/image` is never read
/// as a country name.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/countries", get(countries::list_countries))
        .route("/countries/refresh", post(countries::refresh_countries))
        .route("/countries/image", get(countries::get_summary_image))
        .route(
            "/countries/{name}",
            get(countries::get_country).delete(countries::delete_country),
        )
}
