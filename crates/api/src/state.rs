use std::sync::Arc;

use countryfx_pipeline::{Refresher, SummaryImageCache};
use countryfx_sources::SourceClient;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: countryfx_db::DbPool,
    /// Refresh orchestrator (fetch, merge, persist, render).
    pub refresher: Arc<Refresher>,
    /// Upstream client used by the health check.
    pub sources: SourceClient,
}

impl AppState {
    /// The cached summary image shared with the refresher.
    pub fn image_cache(&self) -> &SummaryImageCache {
        self.refresher.image_cache()
    }
}
