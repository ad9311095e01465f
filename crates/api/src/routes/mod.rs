pub mod countries;
pub mod health;
pub mod index;
pub mod status;

use axum::Router;

use crate::state::AppState;

/// Build the application route tree.
///
/// Route hierarchy:
///
/// ```text
/// /                         service index
/// /health                   service, database and upstream health
///
/// /countries                list (filter/sort via query)
/// /countries/refresh        run a refresh cycle (POST)
/// /countries/image          cached summary image
/// /countries/{name}         get, delete (case-insensitive)
///
/// /status                   aggregate snapshot
/// ```
pub fn app_routes() -> Router<AppState> {
    Router::new()
        .merge(index::router())
        .merge(health::router())
        .merge(countries::router())
        .merge(status::router())
}
