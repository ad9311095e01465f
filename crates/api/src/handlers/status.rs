//! Handler for the aggregate status snapshot.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use countryfx_db::repositories::MetadataRepo;

use crate::error::AppResult;
use crate::state::AppState;

/// GET /status
///
/// Total country count and the time of the last successful refresh.
pub async fn get_status(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let metadata = MetadataRepo::get(&state.pool).await?;

    Ok(Json(metadata))
}
