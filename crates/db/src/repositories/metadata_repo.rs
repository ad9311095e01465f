//! Repository for the singleton `metadata` row.

use sqlx::PgPool;

use crate::models::metadata::Metadata;

/// Provides access to the aggregate metadata row (`id = 1`).
pub struct MetadataRepo;

impl MetadataRepo {
    /// Insert the singleton row if it does not exist yet. Idempotent.
    pub async fn ensure_exists(pool: &PgPool) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO metadata (id, total_countries, last_refreshed_at) \
             VALUES (1, 0, NOW()) \
             ON CONFLICT (id) DO NOTHING",
        )
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Read the aggregate row, or a zero-valued default if it is missing.
    pub async fn get(pool: &PgPool) -> Result<Metadata, sqlx::Error> {
        let row = sqlx::query_as::<_, Metadata>(
            "SELECT total_countries, last_refreshed_at FROM metadata WHERE id = 1",
        )
        .fetch_optional(pool)
        .await?;

        Ok(row.unwrap_or_else(Metadata::empty))
    }

    /// Recompute `total_countries` from the current row count and stamp
    /// `last_refreshed_at` with the current time.
    pub async fn refresh(pool: &PgPool) -> Result<Metadata, sqlx::Error> {
        sqlx::query_as::<_, Metadata>(
            "INSERT INTO metadata (id, total_countries, last_refreshed_at) \
             VALUES (1, (SELECT COUNT(*) FROM countries), NOW()) \
             ON CONFLICT (id) DO UPDATE SET \
                 total_countries = EXCLUDED.total_countries, \
                 last_refreshed_at = EXCLUDED.last_refreshed_at \
             RETURNING total_countries, last_refreshed_at",
        )
        .fetch_one(pool)
        .await
    }
}
