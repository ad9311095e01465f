//! Repository for the `countries` table.
//!
//! Names are matched case-insensitively everywhere, including the upsert
//! conflict target (`uq_countries_name_lower`).

use countryfx_core::country::ProcessedCountry;
use countryfx_core::query::{CountryFilter, SortOption};
use sqlx::PgPool;

use crate::models::country::Country;

/// Column list for `countries` queries.
const COLUMNS: &str = "\
    id, name, capital, region, population, currency_code, exchange_rate, \
    estimated_gdp, flag_url, last_refreshed_at";

/// Provides persistence operations for country records.
pub struct CountryRepo;

impl CountryRepo {
    /// Insert a country, or overwrite every mutable field of the row with the
    /// same (case-insensitive) name. Always refreshes `last_refreshed_at`.
    pub async fn upsert(pool: &PgPool, input: &ProcessedCountry) -> Result<Country, sqlx::Error> {
        let query = format!(
            "INSERT INTO countries \
                 (name, capital, region, population, currency_code, exchange_rate, \
                  estimated_gdp, flag_url, last_refreshed_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, NOW()) \
             ON CONFLICT ((LOWER(name))) DO UPDATE SET \
                 name = EXCLUDED.name, \
                 capital = EXCLUDED.capital, \
                 region = EXCLUDED.region, \
                 population = EXCLUDED.population, \
                 currency_code = EXCLUDED.currency_code, \
                 exchange_rate = EXCLUDED.exchange_rate, \
                 estimated_gdp = EXCLUDED.estimated_gdp, \
                 flag_url = EXCLUDED.flag_url, \
                 last_refreshed_at = NOW() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Country>(&query)
            .bind(&input.name)
            .bind(&input.capital)
            .bind(&input.region)
            .bind(input.population)
            .bind(&input.currency_code)
            .bind(input.exchange_rate)
            .bind(input.estimated_gdp)
            .bind(&input.flag_url)
            .fetch_one(pool)
            .await
    }

    /// List countries matching every set field of `filter`, in the requested
    /// order. No sort keeps insertion order.
    pub async fn list(pool: &PgPool, filter: &CountryFilter) -> Result<Vec<Country>, sqlx::Error> {
        let mut conditions: Vec<String> = Vec::new();
        let mut param_idx: usize = 1;

        if filter.region.is_some() {
            conditions.push(format!("region = ${param_idx}"));
            param_idx += 1;
        }
        if filter.currency.is_some() {
            conditions.push(format!("currency_code = ${param_idx}"));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        };

        let query = format!(
            "SELECT {COLUMNS} FROM countries{where_clause} ORDER BY {}",
            order_by(filter.sort)
        );

        let mut q = sqlx::query_as::<_, Country>(&query);
        if let Some(ref region) = filter.region {
            q = q.bind(region);
        }
        if let Some(ref currency) = filter.currency {
            q = q.bind(currency);
        }

        q.fetch_all(pool).await
    }

    /// Find a country by name, ignoring case.
    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Country>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM countries WHERE LOWER(name) = LOWER($1)");
        sqlx::query_as::<_, Country>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// Delete a country by name, ignoring case.
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete_by_name(pool: &PgPool, name: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM countries WHERE LOWER(name) = LOWER($1)")
            .bind(name)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// The `limit` countries with the highest estimated GDP. Rows without a
    /// GDP are excluded.
    pub async fn top_by_gdp(pool: &PgPool, limit: i64) -> Result<Vec<Country>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM countries \
             WHERE estimated_gdp IS NOT NULL \
             ORDER BY estimated_gdp DESC \
             LIMIT $1"
        );
        sqlx::query_as::<_, Country>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Total number of stored countries.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM countries")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}

/// ORDER BY clause for a sort option. GDP orders put missing values last.
fn order_by(sort: Option<SortOption>) -> &'static str {
    match sort {
        Some(SortOption::GdpDesc) => "estimated_gdp DESC NULLS LAST, id",
        Some(SortOption::GdpAsc) => "estimated_gdp ASC NULLS LAST, id",
        Some(SortOption::NameAsc) => "name ASC",
        Some(SortOption::NameDesc) => "name DESC",
        None => "id",
    }
}
