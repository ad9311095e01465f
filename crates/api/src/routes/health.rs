use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Whether the database is reachable.
    pub db_healthy: bool,
    /// Whether the countries directory answered the health check.
    pub countries_api: bool,
    /// Whether the exchange-rate service answered the health check.
    pub exchange_api: bool,
}

/// GET /health -- returns service, database and upstream health.
///
/// The service is `ok` only when every dependency answers; otherwise it is
/// `degraded`. Either way the response is 200.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let (db, upstream) = tokio::join!(
        countryfx_db::health_check(&state.pool),
        state.sources.check_health(),
    );
    let db_healthy = db.is_ok();

    let status = if db_healthy && upstream.countries && upstream.exchange {
        "ok"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        countries_api: upstream.countries,
        exchange_api: upstream.exchange,
    })
}

/// Mount the health check route.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
