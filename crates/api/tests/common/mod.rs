#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::routing::get as route_get;
use axum::{Json, Router};
use http_body_util::BodyExt;
use serde_json::json;
use sqlx::PgPool;
use tempfile::TempDir;
use tower::ServiceExt;

use countryfx_api::config::{AppEnv, ServerConfig};
use countryfx_api::router::build_app_router;
use countryfx_api::state::AppState;
use countryfx_core::country::FixedMultiplier;
use countryfx_pipeline::{Refresher, SummaryImageCache};
use countryfx_sources::{SourceClient, SourceConfig};

/// Build a test `ServerConfig` with safe defaults pointing at `upstream`.
pub fn test_config(upstream: &str, cache_dir: PathBuf) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        env: AppEnv::Production,
        database_url: String::new(),
        db_max_connections: 5,
        sources: SourceConfig {
            countries_url: format!("{upstream}/countries"),
            exchange_url: format!("{upstream}/rates"),
        },
        cache_dir,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
    }
}

/// A running application plus the temporary cache directory it writes to.
pub struct TestApp {
    pub router: Router,
    pub cache: TempDir,
}

impl TestApp {
    /// A fresh handle to the router (each `oneshot` consumes one).
    pub fn app(&self) -> Router {
        self.router.clone()
    }

    pub fn image_path(&self) -> PathBuf {
        self.cache.path().join("summary.png")
    }
}

/// Build the full application router against `pool` and the fake upstream
/// at `upstream`.
///
/// Uses the same [`build_app_router`] as `main.rs`, so integration tests
/// exercise the production middleware stack. GDP multipliers are pinned to
/// 1000 so estimates are deterministic.
pub fn build_test_app(pool: PgPool, upstream: &str) -> TestApp {
    let cache = tempfile::tempdir().unwrap();
    let config = test_config(upstream, cache.path().to_path_buf());

    let sources = SourceClient::new(config.sources.clone());
    let refresher = Refresher::new(
        pool.clone(),
        Arc::new(sources.clone()),
        SummaryImageCache::new(config.cache_dir.clone()),
    )
    .with_multiplier(Arc::new(FixedMultiplier(1000.0)));

    let state = AppState {
        pool,
        refresher: Arc::new(refresher),
        sources,
    };

    TestApp {
        router: build_app_router(state, &config),
        cache,
    }
}

// ---------------------------------------------------------------------------
// Fake upstream
// ---------------------------------------------------------------------------

/// Serve `router` on an ephemeral port and return its base URL.
pub async fn spawn_upstream(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// Upstream with two countries: Nigeria (NGN at 1600, population 1600) and
/// Antarctica (no currency).
pub async fn spawn_healthy_upstream() -> String {
    let router = Router::new()
        .route(
            "/countries",
            route_get(|| async {
                Json(json!([
                    {
                        "name": "Nigeria",
                        "capital": "Abuja",
                        "region": "Africa",
                        "population": 1600,
                        "flag": "https://flagcdn.com/ng.svg",
                        "currencies": [{"code": "NGN", "name": "Nigerian naira", "symbol": "₦"}]
                    },
                    {
                        "name": "Antarctica",
                        "region": "Polar",
                        "population": 1000
                    }
                ]))
            }),
        )
        .route(
            "/rates",
            route_get(|| async {
                Json(json!({"result": "success", "base_code": "USD", "rates": {"NGN": 1600.0}}))
            }),
        );
    spawn_upstream(router).await
}

/// Upstream whose countries endpoint always answers 503.
pub async fn spawn_failing_upstream() -> String {
    let router = Router::new()
        .route(
            "/countries",
            route_get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "down") }),
        )
        .route(
            "/rates",
            route_get(|| async { Json(json!({"result": "success", "rates": {}})) }),
        );
    spawn_upstream(router).await
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: Router, method: Method, uri: &str) -> Response {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri).await
}

pub async fn post(app: Router, uri: &str) -> Response {
    send(app, Method::POST, uri).await
}

pub async fn delete(app: Router, uri: &str) -> Response {
    send(app, Method::DELETE, uri).await
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
