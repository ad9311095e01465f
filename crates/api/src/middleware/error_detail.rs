//! Development-only error detail.
//!
//! Handlers never put internal causes in a response body. Instead, a 500
//! response carries an [`ErrorDetail`] extension; [`expose_error_detail`]
//! copies it into the JSON body as `details` when running in development
//! mode and drops it otherwise.

use std::any::Any;

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use serde_json::{json, Value};

use crate::config::AppEnv;

/// Upper bound on an error body we are willing to buffer and rewrite.
const MAX_ERROR_BODY_BYTES: usize = 64 * 1024;

/// Internal cause attached to a sanitized error response.
#[derive(Debug, Clone)]
pub struct ErrorDetail(pub String);

/// Middleware: in development, merge any [`ErrorDetail`] into the JSON body.
pub async fn expose_error_detail(
    State(env): State<AppEnv>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;

    let Some(ErrorDetail(detail)) = response.extensions_mut().remove::<ErrorDetail>() else {
        return response;
    };
    if !env.is_development() {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let bytes = match axum::body::to_bytes(body, MAX_ERROR_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(error = %e, "Could not buffer error body");
            return Response::from_parts(parts, Body::empty());
        }
    };

    let Ok(mut json) = serde_json::from_slice::<Value>(&bytes) else {
        return Response::from_parts(parts, Body::from(bytes));
    };
    if let Some(object) = json.as_object_mut() {
        object.insert("details".to_string(), Value::String(detail));
    }

    parts.headers.remove(header::CONTENT_LENGTH);
    Response::from_parts(parts, Body::from(json.to_string()))
}

/// `CatchPanicLayer` handler: a structured 500 instead of a bare body.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "unknown panic payload".to_string()
    };

    tracing::error!(panic = %detail, "Handler panicked");

    let body = json!({
        "error": "Internal server error",
        "code": "INTERNAL_ERROR",
    });
    let mut response = (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(body)).into_response();
    response.extensions_mut().insert(ErrorDetail(detail));
    response
}
