//! Aggregate metadata row model.

use countryfx_core::types::Timestamp;
use serde::Serialize;
use sqlx::FromRow;

/// The singleton row from the `metadata` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Metadata {
    pub total_countries: i64,
    pub last_refreshed_at: Timestamp,
}

impl Metadata {
    /// Zero-valued stand-in used when the singleton row is missing.
    pub fn empty() -> Self {
        Self {
            total_countries: 0,
            last_refreshed_at: chrono::Utc::now(),
        }
    }
}
