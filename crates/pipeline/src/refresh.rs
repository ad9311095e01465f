//! Refresh orchestrator.
//!
//! One refresh cycle:
//!
//! 1. Fetch the countries directory and the exchange-rate table concurrently.
//!    Both must succeed before anything is written.
//! 2. Merge every country with the rate table.
//! 3. Upsert in batches of [`BATCH_SIZE`]: all upserts of a batch run
//!    concurrently, and a batch fully resolves before the next one starts.
//! 4. Recompute the aggregate metadata row.
//! 5. Re-render the cached summary image.
//!
//! A failed upsert aborts the cycle. Batches that already completed stay
//! written; there is no transaction spanning the whole refresh and no retry.

use std::path::PathBuf;
use std::sync::Arc;

use countryfx_core::country::{transform, GdpMultiplier, ProcessedCountry, UniformMultiplier};
use countryfx_core::summary::{
    render_summary_png, SummaryEntry, SummarySnapshot, TOP_COUNTRIES_LIMIT,
};
use countryfx_core::types::Timestamp;
use countryfx_db::models::metadata::Metadata;
use countryfx_db::repositories::{CountryRepo, MetadataRepo};
use countryfx_db::DbPool;
use countryfx_sources::CountrySource;
use futures::future::join_all;
use crate::error::{RefreshError, SummaryImageError};
use crate::image_cache::SummaryImageCache;

/// Number of upserts issued concurrently per batch.
pub const BATCH_SIZE: usize = 10;

/// Result of a successful refresh cycle.
#[derive(Debug, Clone)]
pub struct RefreshOutcome {
    /// Row count after the refresh.
    pub total_countries: i64,
    pub last_refreshed_at: Timestamp,
    /// Number of records fetched and upserted in this cycle.
    pub processed: usize,
    /// Path of the regenerated summary image, if rendering succeeded.
    pub image_path: Option<PathBuf>,
}

/// Coordinates a full refresh cycle.
#[derive(Clone)]
pub struct Refresher {
    pool: DbPool,
    source: Arc<dyn CountrySource>,
    multiplier: Arc<dyn GdpMultiplier>,
    image_cache: SummaryImageCache,
}

impl Refresher {
    /// Build a refresher that draws GDP multipliers uniformly at random.
    pub fn new(
        pool: DbPool,
        source: Arc<dyn CountrySource>,
        image_cache: SummaryImageCache,
    ) -> Self {
        Self {
            pool,
            source,
            multiplier: Arc::new(UniformMultiplier),
            image_cache,
        }
    }

    /// Replace the GDP multiplier source.
    pub fn with_multiplier(mut self, multiplier: Arc<dyn GdpMultiplier>) -> Self {
        self.multiplier = multiplier;
        self
    }

    pub fn image_cache(&self) -> &SummaryImageCache {
        &self.image_cache
    }

    /// Run one refresh cycle.
    pub async fn refresh(&self) -> Result<RefreshOutcome, RefreshError> {
        tracing::info!("Starting countries refresh");

        let (raw_countries, rates) = tokio::try_join!(
            self.source.fetch_countries(),
            self.source.fetch_exchange_rates(),
        )?;

        tracing::debug!(
            countries = raw_countries.len(),
            rates = rates.len(),
            "Processing countries",
        );

        let processed: Vec<ProcessedCountry> = raw_countries
            .iter()
            .map(|raw| transform(raw, &rates, self.multiplier.as_ref()))
            .collect();

        persist_in_batches(&self.pool, &processed).await?;

        let metadata = MetadataRepo::refresh(&self.pool).await?;

        let image_path = self.regenerate_summary_image(&metadata).await;

        tracing::info!(
            processed = processed.len(),
            total_countries = metadata.total_countries,
            "Countries refresh completed",
        );

        Ok(RefreshOutcome {
            total_countries: metadata.total_countries,
            last_refreshed_at: metadata.last_refreshed_at,
            processed: processed.len(),
            image_path,
        })
    }

    /// Build the summary snapshot from the store and overwrite the cached
    /// image. Failures are logged; the refreshed data is already committed.
    async fn regenerate_summary_image(&self, metadata: &Metadata) -> Option<PathBuf> {
        match self.try_regenerate_summary_image(metadata).await {
            Ok(path) => {
                tracing::info!(path = %path.display(), "Summary image generated");
                Some(path)
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to generate summary image");
                None
            }
        }
    }

    async fn try_regenerate_summary_image(
        &self,
        metadata: &Metadata,
    ) -> Result<PathBuf, SummaryImageError> {
        let top = CountryRepo::top_by_gdp(&self.pool, TOP_COUNTRIES_LIMIT).await?;

        let snapshot = SummarySnapshot {
            total_countries: metadata.total_countries,
            top_countries: top.iter().map(SummaryEntry::from).collect(),
            last_refreshed_at: metadata.last_refreshed_at,
        };

        let bytes = tokio::task::spawn_blocking(move || render_summary_png(&snapshot)).await??;

        Ok(self.image_cache.write(bytes).await?)
    }
}

/// Upsert `countries` in sequential batches of [`BATCH_SIZE`].
///
/// Every upsert in a batch is awaited, even after one of them fails, so no
/// write is left in flight when the error propagates.
async fn persist_in_batches(
    pool: &DbPool,
    countries: &[ProcessedCountry],
) -> Result<(), sqlx::Error> {
    let total = countries.len();
    let mut saved = 0;

    for batch in countries.chunks(BATCH_SIZE) {
        let results = join_all(batch.iter().map(|c| CountryRepo::upsert(pool, c))).await;

        for result in results {
            result?;
        }

        saved += batch.len();
        tracing::debug!(saved, total, "Saved batch");
    }

    Ok(())
}
