//! Integration tests for the health check, the service index, and general
//! HTTP behaviour.

mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use common::{body_json, get, send};
use sqlx::PgPool;
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// Test: GET /health reports database and upstream health
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn health_check_returns_ok_with_json(pool: PgPool) {
    let upstream = common::spawn_healthy_upstream().await;
    let test = common::build_test_app(pool, &upstream);
    let response = get(test.app(), "/health").await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
    assert_eq!(json["db_healthy"], true);
    assert_eq!(json["countries_api"], true);
    assert_eq!(json["exchange_api"], true);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn health_check_is_degraded_when_upstream_fails(pool: PgPool) {
    let upstream = common::spawn_failing_upstream().await;
    let test = common::build_test_app(pool, &upstream);
    let response = get(test.app(), "/health").await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["db_healthy"], true);
    assert_eq!(json["countries_api"], false);
    assert_eq!(json["exchange_api"], true);
}

// ---------------------------------------------------------------------------
// Test: GET / describes the service
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn index_lists_endpoints(pool: PgPool) {
    let upstream = common::spawn_healthy_upstream().await;
    let test = common::build_test_app(pool, &upstream);
    let response = get(test.app(), "/").await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["message"], "Country Currency API");
    assert_eq!(json["status"], "running");
    assert!(json["version"].is_string());
    assert_eq!(json["endpoints"]["refresh"], "POST /countries/refresh");
}

// ---------------------------------------------------------------------------
// Test: Unknown routes return the structured 404
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_route_returns_404(pool: PgPool) {
    let upstream = common::spawn_healthy_upstream().await;
    let test = common::build_test_app(pool, &upstream);
    let response = get(test.app(), "/this-route-does-not-exist").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_json(response).await;
    assert_eq!(json["error"], "Not found");
    assert_eq!(
        json["message"],
        "Route GET /this-route-does-not-exist does not exist"
    );
    assert!(json["availableRoutes"]
        .as_array()
        .unwrap()
        .iter()
        .any(|r| r == "GET /status"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unsupported_method_returns_404(pool: PgPool) {
    let upstream = common::spawn_healthy_upstream().await;
    let test = common::build_test_app(pool, &upstream);
    let response = send(test.app(), Method::PUT, "/countries").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_json(response).await;
    assert_eq!(json["message"], "Route PUT /countries does not exist");
}

// ---------------------------------------------------------------------------
// Test: x-request-id header is present in response
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn response_contains_x_request_id_header(pool: PgPool) {
    let upstream = common::spawn_healthy_upstream().await;
    let test = common::build_test_app(pool, &upstream);
    let response = get(test.app(), "/status").await;

    assert_eq!(response.status(), StatusCode::OK);

    let request_id = response.headers().get("x-request-id");
    assert!(
        request_id.is_some(),
        "Response must contain an x-request-id header"
    );

    // The value should be a valid UUID (36 chars with hyphens).
    let id_str = request_id.unwrap().to_str().unwrap();
    assert_eq!(id_str.len(), 36, "x-request-id should be a UUID string");
}

// ---------------------------------------------------------------------------
// Test: CORS preflight OPTIONS request returns correct headers
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn cors_preflight_returns_correct_headers(pool: PgPool) {
    let upstream = common::spawn_healthy_upstream().await;
    let test = common::build_test_app(pool, &upstream);

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/countries")
        .header("Origin", "http://localhost:5173")
        .header("Access-Control-Request-Method", "GET")
        .header("Access-Control-Request-Headers", "content-type")
        .body(Body::empty())
        .unwrap();

    let response = test.app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "http://localhost:5173"
    );
    assert_eq!(response.headers()["access-control-allow-credentials"], "true");
}
