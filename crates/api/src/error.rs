use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use countryfx_core::error::CoreError;
use countryfx_pipeline::RefreshError;
use serde_json::json;

use crate::middleware::error_detail::ErrorDetail;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `countryfx_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A failed refresh cycle.
    #[error(transparent)]
    Refresh(#[from] RefreshError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

/// Generic message returned for every 500.
const INTERNAL_MESSAGE: &str = "Internal server error";

/// Message returned when an upstream data source fails.
pub const SOURCE_UNAVAILABLE_MESSAGE: &str = "External data source unavailable";

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            // --- CoreError variants ---
            AppError::Core(CoreError::NotFound { entity, name }) => {
                tracing::debug!(entity, name = %name, "Not found");
                error_body(StatusCode::NOT_FOUND, "NOT_FOUND", format!("{entity} not found"))
            }
            AppError::Core(CoreError::Validation(msg)) => {
                error_body(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }

            // --- Refresh failures ---
            AppError::Refresh(RefreshError::Source(err)) => {
                tracing::warn!(error = %err, "External data source unavailable");
                let body = json!({
                    "error": SOURCE_UNAVAILABLE_MESSAGE,
                    "code": "SOURCE_UNAVAILABLE",
                    "details": err.to_string(),
                });
                (StatusCode::SERVICE_UNAVAILABLE, axum::Json(body)).into_response()
            }
            AppError::Refresh(RefreshError::Database(err)) => internal(err),

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => {
                error_body(StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone())
            }
            AppError::InternalError(msg) => internal(msg),
        }
    }
}

fn error_body(status: StatusCode, code: &'static str, message: String) -> Response {
    let body = json!({
        "error": message,
        "code": code,
    });
    (status, axum::Json(body)).into_response()
}

/// A sanitized 500. The real cause is logged and attached as an
/// [`ErrorDetail`] extension, which only development mode exposes.
fn internal(cause: &dyn std::fmt::Display) -> Response {
    let detail = cause.to_string();
    tracing::error!(error = %detail, "Internal error");
    let mut response = error_body(
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        INTERNAL_MESSAGE.to_string(),
    );
    response.extensions_mut().insert(ErrorDetail(detail));
    response
}

/// Classify a sqlx error into an HTTP response.
///
/// - `RowNotFound` maps to 404.
/// - Everything else maps to a sanitized 500.
fn classify_sqlx_error(err: &sqlx::Error) -> Response {
    match err {
        sqlx::Error::RowNotFound => error_body(
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        other => internal(other),
    }
}
