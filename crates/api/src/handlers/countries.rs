//! Handlers for the `/countries` resource.
//!
//! Covers the refresh trigger, filtered listing, lookup and deletion by
//! name, and the cached summary image.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use countryfx_core::error::CoreError;
use countryfx_core::query::{CountryFilter, CountryListParams};
use countryfx_core::types::Timestamp;
use countryfx_db::repositories::CountryRepo;
use serde::Serialize;
use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Body of a successful refresh.
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub message: &'static str,
    pub total_countries: i64,
    pub last_refreshed_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Refresh
// ---------------------------------------------------------------------------

/// POST /countries/refresh
///
/// Run a full refresh cycle and regenerate the summary image.
pub async fn refresh_countries(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let outcome = state.refresher.refresh().await?;

    Ok(Json(RefreshResponse {
        message: "Countries data refreshed successfully",
        total_countries: outcome.total_countries,
        last_refreshed_at: outcome.last_refreshed_at,
    }))
}

// ---------------------------------------------------------------------------
// Read / delete
// ---------------------------------------------------------------------------

/// GET /countries
///
/// List countries, optionally filtered by `region` and `currency` and
/// ordered by `sort`. A query string that cannot be decoded (for example a
/// repeated key) is a 400.
pub async fn list_countries(
    State(state): State<AppState>,
    query: Result<Query<CountryListParams>, QueryRejection>,
) -> AppResult<impl IntoResponse> {
    let Query(params) = query.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    let filter = CountryFilter::from_params(&params);
    let countries = CountryRepo::list(&state.pool, &filter).await?;

    tracing::debug!(count = countries.len(), ?filter, "Listed countries");

    Ok(Json(countries))
}

/// GET /countries/{name}
///
/// Case-insensitive lookup by name.
pub async fn get_country(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<impl IntoResponse> {
    let name = validated_name(&name)?;

    let country = CountryRepo::find_by_name(&state.pool, name)
        .await?
        .ok_or_else(|| country_not_found(name))?;

    Ok(Json(country))
}

/// DELETE /countries/{name}
///
/// Case-insensitive delete by name.
pub async fn delete_country(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<impl IntoResponse> {
    let name = validated_name(&name)?;

    if !CountryRepo::delete_by_name(&state.pool, name).await? {
        return Err(country_not_found(name));
    }

    tracing::info!(name, "Country deleted");

    Ok(Json(json!({
        "message": format!("Country \"{name}\" deleted successfully"),
    })))
}

// ---------------------------------------------------------------------------
// Summary image
// ---------------------------------------------------------------------------

/// GET /countries/image
///
/// Serve the summary image produced by the last successful refresh.
pub async fn get_summary_image(State(state): State<AppState>) -> AppResult<Response> {
    let bytes = state
        .image_cache()
        .read()
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to read summary image: {e}")))?;

    let Some(bytes) = bytes else {
        let body = json!({
            "error": "Summary image not found",
            "hint": "Call POST /countries/refresh to generate the image",
        });
        return Ok((StatusCode::NOT_FOUND, Json(body)).into_response());
    };

    Ok(([(header::CONTENT_TYPE, "image/png")], bytes).into_response())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn validated_name(name: &str) -> Result<&str, AppError> {
    countryfx_core::country::validate_country_name(name)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    Ok(name.trim())
}

fn country_not_found(name: &str) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Country",
        name: name.to_string(),
    })
}
