use countryfx_sources::SourceError;

/// Why a refresh cycle stopped.
///
/// Rows written by batches that completed before the failure stay written.
#[derive(Debug, thiserror::Error)]
pub enum RefreshError {
    /// An upstream fetch failed or returned unusable data. Nothing was written.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// A database write or read failed.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Why the summary image could not be regenerated.
///
/// Never fails a refresh; the cycle logs it and reports no image path.
#[derive(Debug, thiserror::Error)]
pub enum SummaryImageError {
    /// Reading the top countries failed.
    #[error("Failed to load summary data: {0}")]
    Query(#[from] sqlx::Error),

    /// PNG encoding failed.
    #[error("Failed to render summary image: {0}")]
    Render(#[from] image::ImageError),

    /// The render task panicked or was cancelled.
    #[error("Summary render task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// Writing the cached file failed.
    #[error("Failed to write summary image: {0}")]
    Write(#[from] std::io::Error),
}
