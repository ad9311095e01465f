use axum::routing::get;
use axum::Router;

use crate::handlers::status;
use crate::state::AppState;

/// Mount the aggregate status route.
pub fn router() -> Router<AppState> {
    Router::new().route("/status", get(status::get_status))
}
