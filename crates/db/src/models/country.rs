//! Country row model.

use countryfx_core::summary::SummaryEntry;
use countryfx_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `countries` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Country {
    pub id: DbId,
    pub name: String,
    pub capital: Option<String>,
    pub region: Option<String>,
    pub population: i64,
    pub currency_code: Option<String>,
    pub exchange_rate: Option<f64>,
    pub estimated_gdp: Option<f64>,
    pub flag_url: Option<String>,
    pub last_refreshed_at: Timestamp,
}

impl From<&Country> for SummaryEntry {
    fn from(country: &Country) -> Self {
        SummaryEntry {
            name: country.name.clone(),
            estimated_gdp: country.estimated_gdp,
        }
    }
}
