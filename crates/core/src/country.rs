//! Country records and the merge transform.
//!
//! A [`RawCountry`] from the countries directory is combined with the
//! [`ExchangeRates`] table into a [`ProcessedCountry`] ready for upsert.
//! The estimated GDP is a synthetic placeholder metric: population scaled by
//! a random multiplier in `[1000, 2000)` and divided by the exchange rate.
//! It is not a real economic figure.

use std::collections::HashMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Inclusive lower bound of the GDP multiplier.
pub const GDP_MULTIPLIER_MIN: f64 = 1000.0;
/// Exclusive upper bound of the GDP multiplier.
pub const GDP_MULTIPLIER_MAX: f64 = 2000.0;

/// Maximum length of a country name (matches the `countries.name` column).
pub const MAX_NAME_LENGTH: usize = 255;
/// Column limit for `countries.capital`.
pub const MAX_CAPITAL_LENGTH: usize = 255;
/// Column limit for `countries.region`.
pub const MAX_REGION_LENGTH: usize = 100;
/// Column limit for `countries.currency_code`.
pub const MAX_CURRENCY_CODE_LENGTH: usize = 10;

// ---------------------------------------------------------------------------
// Source shapes
// ---------------------------------------------------------------------------

/// One currency entry as reported by the countries directory.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct RawCurrency {
    pub code: Option<String>,
    pub name: Option<String>,
    pub symbol: Option<String>,
}

/// One country as reported by the countries directory.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RawCountry {
    pub name: String,
    #[serde(default)]
    pub capital: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    pub population: i64,
    #[serde(default)]
    pub flag: Option<String>,
    #[serde(default)]
    pub currencies: Option<Vec<RawCurrency>>,
}

/// Currency code -> rate relative to the exchange service's base currency.
pub type ExchangeRates = HashMap<String, f64>;

/// A merged record ready to be written by the persistence layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessedCountry {
    pub name: String,
    pub capital: Option<String>,
    pub region: Option<String>,
    pub population: i64,
    pub currency_code: Option<String>,
    pub exchange_rate: Option<f64>,
    pub estimated_gdp: Option<f64>,
    pub flag_url: Option<String>,
}

// ---------------------------------------------------------------------------
// Multiplier source
// ---------------------------------------------------------------------------

/// Supplies the per-record GDP multiplier.
pub trait GdpMultiplier: Send + Sync {
    /// Draw the next multiplier. Called once per record that has a rate.
    fn next_multiplier(&self) -> f64;
}

/// Draws from a uniform distribution over `[1000, 2000)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformMultiplier;

impl GdpMultiplier for UniformMultiplier {
    fn next_multiplier(&self) -> f64 {
        rand::rng().random_range(GDP_MULTIPLIER_MIN..GDP_MULTIPLIER_MAX)
    }
}

/// Always returns the same multiplier.
#[derive(Debug, Clone, Copy)]
pub struct FixedMultiplier(pub f64);

impl GdpMultiplier for FixedMultiplier {
    fn next_multiplier(&self) -> f64 {
        self.0
    }
}

// ---------------------------------------------------------------------------
// Transform
// ---------------------------------------------------------------------------

/// Merge one raw country with the exchange-rate table.
///
/// The currency code is the first listed currency's code. The rate and the
/// estimated GDP are only set when that code is present in `rates`.
pub fn transform(
    raw: &RawCountry,
    rates: &ExchangeRates,
    multiplier: &dyn GdpMultiplier,
) -> ProcessedCountry {
    let currency_code = raw
        .currencies
        .as_ref()
        .and_then(|list| list.first())
        .and_then(|currency| non_blank(currency.code.as_deref()));

    let exchange_rate = currency_code
        .as_deref()
        .and_then(|code| rates.get(code).copied())
        .filter(|rate| *rate > 0.0 && rate.is_finite());

    let estimated_gdp = exchange_rate
        .map(|rate| raw.population as f64 * multiplier.next_multiplier() / rate);

    ProcessedCountry {
        name: raw.name.trim().to_string(),
        capital: non_blank(raw.capital.as_deref()),
        region: non_blank(raw.region.as_deref()),
        population: raw.population,
        currency_code,
        exchange_rate,
        estimated_gdp,
        flag_url: non_blank(raw.flag.as_deref()),
    }
}

/// Map `None` and whitespace-only strings to `None`.
fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a raw record received from the countries directory.
///
/// Lengths are checked on the trimmed values [`transform`] would store, in
/// characters, against the column limits.
pub fn validate_raw_country(raw: &RawCountry) -> Result<(), String> {
    let name = raw.name.trim();
    if name.is_empty() {
        return Err("country name cannot be empty".to_string());
    }
    check_length("country name", Some(name), MAX_NAME_LENGTH)?;
    if raw.population < 0 {
        return Err(format!(
            "population of {name} must not be negative, got {}",
            raw.population
        ));
    }
    check_length("capital", raw.capital.as_deref(), MAX_CAPITAL_LENGTH)?;
    check_length("region", raw.region.as_deref(), MAX_REGION_LENGTH)?;

    let first_code = raw
        .currencies
        .as_ref()
        .and_then(|list| list.first())
        .and_then(|currency| currency.code.as_deref());
    check_length("currency code", first_code, MAX_CURRENCY_CODE_LENGTH)?;

    Ok(())
}

fn check_length(field: &str, value: Option<&str>, max: usize) -> Result<(), String> {
    match value.map(|v| v.trim().chars().count()) {
        Some(len) if len > max => Err(format!(
            "{field} exceeds maximum length of {max} characters, got {len}"
        )),
        _ => Ok(()),
    }
}

/// Validate a country name taken from a request path.
pub fn validate_country_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("Country name is required".to_string());
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(format!(
            "Country name must be less than {MAX_NAME_LENGTH} characters"
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn currency(code: &str) -> RawCurrency {
        RawCurrency {
            code: Some(code.to_string()),
            name: None,
            symbol: None,
        }
    }

    fn raw(name: &str, population: i64, currencies: Option<Vec<RawCurrency>>) -> RawCountry {
        RawCountry {
            name: name.to_string(),
            capital: Some("Capital".to_string()),
            region: Some("Africa".to_string()),
            population,
            flag: Some("https://flags.example/x.svg".to_string()),
            currencies,
        }
    }

    fn rates() -> ExchangeRates {
        ExchangeRates::from([("NGN".to_string(), 1600.0), ("GHS".to_string(), 15.5)])
    }

    #[test]
    fn known_currency_sets_rate_and_gdp() {
        let country = raw("Nigeria", 206_139_589, Some(vec![currency("NGN")]));
        let out = transform(&country, &rates(), &FixedMultiplier(1500.0));

        assert_eq!(out.currency_code.as_deref(), Some("NGN"));
        assert_eq!(out.exchange_rate, Some(1600.0));
        let expected = 206_139_589.0 * 1500.0 / 1600.0;
        assert_eq!(out.estimated_gdp, Some(expected));
    }

    #[test]
    fn gdp_is_positive_for_positive_population() {
        let country = raw("Ghana", 31_072_940, Some(vec![currency("GHS")]));
        let out = transform(&country, &rates(), &UniformMultiplier);
        assert!(out.estimated_gdp.unwrap() > 0.0);
    }

    #[test]
    fn only_first_currency_is_used() {
        let country = raw(
            "Somewhere",
            10,
            Some(vec![currency("XYZ"), currency("NGN")]),
        );
        let out = transform(&country, &rates(), &FixedMultiplier(1000.0));

        assert_eq!(out.currency_code.as_deref(), Some("XYZ"));
        assert_eq!(out.exchange_rate, None);
        assert_eq!(out.estimated_gdp, None);
    }

    #[test]
    fn unknown_currency_leaves_rate_and_gdp_absent() {
        let country = raw("Nowhere", 500, Some(vec![currency("ZZZ")]));
        let out = transform(&country, &rates(), &FixedMultiplier(1000.0));

        assert_eq!(out.currency_code.as_deref(), Some("ZZZ"));
        assert!(out.exchange_rate.is_none());
        assert!(out.estimated_gdp.is_none());
    }

    #[test]
    fn missing_currency_list_leaves_all_currency_fields_absent() {
        let out = transform(&raw("Antarctica", 1000, None), &rates(), &UniformMultiplier);
        assert!(out.currency_code.is_none());
        assert!(out.exchange_rate.is_none());
        assert!(out.estimated_gdp.is_none());

        let out = transform(
            &raw("Antarctica", 1000, Some(vec![])),
            &rates(),
            &UniformMultiplier,
        );
        assert!(out.currency_code.is_none());
    }

    #[test]
    fn blank_optional_fields_map_to_none() {
        let mut country = raw("Bouvet Island", 0, None);
        country.capital = Some(String::new());
        country.region = Some("  ".to_string());
        country.flag = None;

        let out = transform(&country, &rates(), &UniformMultiplier);
        assert_eq!(out.capital, None);
        assert_eq!(out.region, None);
        assert_eq!(out.flag_url, None);
    }

    #[test]
    fn zero_population_gives_zero_gdp() {
        let country = raw("Empty", 0, Some(vec![currency("NGN")]));
        let out = transform(&country, &rates(), &FixedMultiplier(1234.0));
        assert_eq!(out.estimated_gdp, Some(0.0));
    }

    #[test]
    fn uniform_multiplier_stays_in_range() {
        let source = UniformMultiplier;
        for _ in 0..1000 {
            let m = source.next_multiplier();
            assert!((GDP_MULTIPLIER_MIN..GDP_MULTIPLIER_MAX).contains(&m));
        }
    }

    #[test]
    fn raw_country_deserializes_with_missing_optionals() {
        let json = r#"{"name":"Nauru","population":10834}"#;
        let parsed: RawCountry = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.name, "Nauru");
        assert!(parsed.capital.is_none());
        assert!(parsed.currencies.is_none());
    }

    #[test]
    fn validate_raw_country_rejects_bad_records() {
        assert!(validate_raw_country(&raw("Ok", 1, None)).is_ok());
        assert!(validate_raw_country(&raw("  ", 1, None)).is_err());
        assert!(validate_raw_country(&raw("Negative", -1, None)).is_err());
    }

    #[test]
    fn validate_raw_country_enforces_column_lengths() {
        let mut long_region = raw("Ok", 1, None);
        long_region.region = Some("r".repeat(MAX_REGION_LENGTH + 1));
        let err = validate_raw_country(&long_region).unwrap_err();
        assert!(err.starts_with("region exceeds maximum length"));

        let mut long_capital = raw("Ok", 1, None);
        long_capital.capital = Some("c".repeat(MAX_CAPITAL_LENGTH + 1));
        assert!(validate_raw_country(&long_capital).is_err());

        let long_code = raw("Ok", 1, Some(vec![currency("ABCDEFGHIJK")]));
        let err = validate_raw_country(&long_code).unwrap_err();
        assert!(err.starts_with("currency code exceeds maximum length"));

        // Only the stored (first) code is checked, and limits count characters.
        let later_code = raw("Ok", 1, Some(vec![currency("NGN"), currency("ABCDEFGHIJK")]));
        assert!(validate_raw_country(&later_code).is_ok());
        let accented = raw(&"é".repeat(MAX_NAME_LENGTH), 1, None);
        assert!(validate_raw_country(&accented).is_ok());
    }

    #[test]
    fn validate_country_name_rejects_blank() {
        assert!(validate_country_name("Nigeria").is_ok());
        assert!(validate_country_name("").is_err());
        assert!(validate_country_name("   ").is_err());
        assert!(validate_country_name(&"x".repeat(MAX_NAME_LENGTH + 1)).is_err());
    }
}
