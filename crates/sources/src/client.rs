//! HTTP client for the countries directory and exchange-rate service.
//!
//! Wraps both upstream JSON endpoints using [`reqwest`]. Each fetch carries
//! its own timeout; there is no retry.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use countryfx_core::country::{validate_raw_country, ExchangeRates, RawCountry};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::error::{SourceError, Upstream};

/// Timeout for a data fetch.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Timeout for a health check.
pub const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

/// Default countries directory endpoint.
pub const DEFAULT_COUNTRIES_API_URL: &str =
    "https://restcountries.com/v2/all?fields=name,capital,region,population,flag,currencies";

/// Default exchange-rate endpoint (USD base).
pub const DEFAULT_EXCHANGE_API_URL: &str = "https://open.er-api.com/v6/latest/USD";

/// Value of `result` on a successful exchange-rate response.
const EXCHANGE_SUCCESS: &str = "success";

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Upstream endpoint URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    pub countries_url: String,
    pub exchange_url: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            countries_url: DEFAULT_COUNTRIES_API_URL.to_string(),
            exchange_url: DEFAULT_EXCHANGE_API_URL.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Wire shapes
// ---------------------------------------------------------------------------

/// Envelope returned by the exchange-rate service.
#[derive(Debug, Deserialize)]
pub struct ExchangeRateResponse {
    pub result: String,
    #[serde(default)]
    pub base_code: Option<String>,
    /// Absent on error envelopes; required when `result` is `success`.
    #[serde(default)]
    pub rates: Option<HashMap<String, f64>>,
    #[serde(default)]
    pub time_last_update_utc: Option<String>,
}

/// Reachability of each upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UpstreamHealth {
    pub countries: bool,
    pub exchange: bool,
}

// ---------------------------------------------------------------------------
// Source trait
// ---------------------------------------------------------------------------

/// Anything that can supply the raw inputs of a refresh.
#[async_trait]
pub trait CountrySource: Send + Sync {
    /// Fetch and validate the full countries directory.
    async fn fetch_countries(&self) -> Result<Vec<RawCountry>, SourceError>;

    /// Fetch the exchange-rate table.
    async fn fetch_exchange_rates(&self) -> Result<ExchangeRates, SourceError>;
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// HTTP client for both upstream services.
#[derive(Debug, Clone)]
pub struct SourceClient {
    client: reqwest::Client,
    config: SourceConfig,
}

impl SourceClient {
    pub fn new(config: SourceConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Check both upstreams concurrently. A check succeeds on any 2xx answer
    /// within [`HEALTH_TIMEOUT`].
    pub async fn check_health(&self) -> UpstreamHealth {
        let (countries, exchange) = tokio::join!(
            self.check_upstream(Upstream::Countries, &self.config.countries_url),
            self.check_upstream(Upstream::ExchangeRates, &self.config.exchange_url),
        );
        UpstreamHealth {
            countries,
            exchange,
        }
    }

    async fn check_upstream(&self, upstream: Upstream, url: &str) -> bool {
        let result = self
            .client
            .get(url)
            .timeout(HEALTH_TIMEOUT)
            .send()
            .await
            .map_err(|e| SourceError::from_reqwest(upstream, e))
            .and_then(|resp| ensure_success(upstream, resp));

        match result {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(%upstream, error = %e, "Upstream health check failed");
                false
            }
        }
    }

    /// GET `url` and decode the body as `T`.
    async fn get_json<T: DeserializeOwned>(
        &self,
        upstream: Upstream,
        url: &str,
    ) -> Result<T, SourceError> {
        let response = self
            .client
            .get(url)
            .timeout(FETCH_TIMEOUT)
            .send()
            .await
            .map_err(|e| SourceError::from_reqwest(upstream, e))?;

        let response = ensure_success(upstream, response)?;

        let bytes = response
            .bytes()
            .await
            .map_err(|e| SourceError::from_reqwest(upstream, e))?;

        serde_json::from_slice(&bytes).map_err(|e| SourceError::Malformed {
            upstream,
            detail: e.to_string(),
        })
    }
}

#[async_trait]
impl CountrySource for SourceClient {
    async fn fetch_countries(&self) -> Result<Vec<RawCountry>, SourceError> {
        tracing::debug!(url = %self.config.countries_url, "Fetching countries");
        let countries: Vec<RawCountry> = self
            .get_json(Upstream::Countries, &self.config.countries_url)
            .await?;

        validate_countries(&countries)?;

        tracing::info!(count = countries.len(), "Fetched countries");
        Ok(countries)
    }

    async fn fetch_exchange_rates(&self) -> Result<ExchangeRates, SourceError> {
        tracing::debug!(url = %self.config.exchange_url, "Fetching exchange rates");
        let response: ExchangeRateResponse = self
            .get_json(Upstream::ExchangeRates, &self.config.exchange_url)
            .await?;

        let rates = rates_from_response(response)?;

        tracing::info!(count = rates.len(), "Fetched exchange rates");
        Ok(rates)
    }
}

/// Reject a non-2xx response.
fn ensure_success(
    upstream: Upstream,
    response: reqwest::Response,
) -> Result<reqwest::Response, SourceError> {
    let status = response.status();
    if !status.is_success() {
        return Err(SourceError::HttpStatus {
            upstream,
            status: status.as_u16(),
        });
    }
    Ok(response)
}

/// Validate every record of a countries payload. The first invalid record
/// fails the whole payload.
pub fn validate_countries(countries: &[RawCountry]) -> Result<(), SourceError> {
    if countries.is_empty() {
        return Err(SourceError::Malformed {
            upstream: Upstream::Countries,
            detail: "empty country list".to_string(),
        });
    }
    for (index, country) in countries.iter().enumerate() {
        validate_raw_country(country).map_err(|detail| SourceError::Malformed {
            upstream: Upstream::Countries,
            detail: format!("entry {index}: {detail}"),
        })?;
    }
    Ok(())
}

/// Extract the rate table from a decoded exchange-rate envelope.
///
/// Unusable rates (zero, negative, not finite) are dropped, so currencies
/// quoted with them count as unknown rather than failing the whole table.
pub fn rates_from_response(response: ExchangeRateResponse) -> Result<ExchangeRates, SourceError> {
    if response.result != EXCHANGE_SUCCESS {
        return Err(SourceError::Unsuccessful {
            result: response.result,
        });
    }

    let Some(raw_rates) = response.rates else {
        return Err(SourceError::Malformed {
            upstream: Upstream::ExchangeRates,
            detail: "missing rates table".to_string(),
        });
    };

    let total = raw_rates.len();
    let rates: ExchangeRates = raw_rates
        .into_iter()
        .filter(|(_, rate)| rate.is_finite() && *rate > 0.0)
        .collect();

    if rates.len() < total {
        tracing::warn!(
            skipped = total - rates.len(),
            "Ignoring unusable exchange rates",
        );
    }
    Ok(rates)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
