//! Service index and the catch-all 404.

use axum::extract::OriginalUri;
use axum::http::{Method, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

/// Every route the service exposes, as `METHOD path`.
pub const AVAILABLE_ROUTES: [&str; 8] = [
    "GET /",
    "GET /health",
    "POST /countries/refresh",
    "GET /countries",
    "GET /countries/image",
    "GET /countries/:name",
    "DELETE /countries/:name",
    "GET /status",
];

/// GET /
pub async fn index() -> impl IntoResponse {
    Json(json!({
        "message": "Country Currency API",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
        "endpoints": {
            "refresh": "POST /countries/refresh",
            "list": "GET /countries?region=&currency=&sort=gdp_desc|gdp_asc|name_asc|name_desc",
            "get": "GET /countries/:name",
            "delete": "DELETE /countries/:name",
            "image": "GET /countries/image",
            "status": "GET /status",
            "health": "GET /health",
        },
    }))
}

/// Fallback for unmatched routes and unsupported methods.
pub async fn not_found(method: Method, OriginalUri(uri): OriginalUri) -> impl IntoResponse {
    tracing::debug!(%method, %uri, "No route matched");

    let body = json!({
        "error": "Not found",
        "message": format!("Route {method} {uri} does not exist"),
        "availableRoutes": AVAILABLE_ROUTES,
    });
    (StatusCode::NOT_FOUND, Json(body))
}
