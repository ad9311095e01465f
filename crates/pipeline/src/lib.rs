//! Refresh pipeline: fetch both upstreams, merge, persist in batches, update
//! the aggregate row, and regenerate the cached summary image.

pub mod error;
pub mod image_cache;
pub mod refresh;

pub use error::{RefreshError, SummaryImageError};
pub use image_cache::SummaryImageCache;
pub use refresh::{RefreshOutcome, Refresher, BATCH_SIZE};
