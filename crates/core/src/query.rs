//! Filter and sort normalization for country listing.
//!
//! Query strings arrive as loose optional strings; [`CountryFilter::from_params`]
//! turns them into the normalized filter the repository layer consumes.

use serde::Deserialize;

/// Sort orders accepted by `GET /countries?sort=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOption {
    GdpDesc,
    GdpAsc,
    NameAsc,
    NameDesc,
}

impl SortOption {
    /// Every accepted sort option.
    pub const ALL: [SortOption; 4] = [
        SortOption::GdpDesc,
        SortOption::GdpAsc,
        SortOption::NameAsc,
        SortOption::NameDesc,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SortOption::GdpDesc => "gdp_desc",
            SortOption::GdpAsc => "gdp_asc",
            SortOption::NameAsc => "name_asc",
            SortOption::NameDesc => "name_desc",
        }
    }

    /// Parse a sort value. Case-insensitive, surrounding whitespace ignored.
    /// Unrecognized values yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|opt| opt.as_str() == value)
    }
}

impl std::fmt::Display for SortOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw query parameters for `GET /countries`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CountryListParams {
    pub region: Option<String>,
    pub currency: Option<String>,
    pub sort: Option<String>,
}

/// Normalized listing filter: a conjunction of the set fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountryFilter {
    /// Region equality, trimmed.
    pub region: Option<String>,
    /// Currency code equality, trimmed and upper-cased.
    pub currency: Option<String>,
    /// Requested order; `None` keeps the store's natural order.
    pub sort: Option<SortOption>,
}

impl CountryFilter {
    pub fn from_params(params: &CountryListParams) -> Self {
        let region = params
            .region
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        let currency = params
            .currency
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_uppercase);

        let sort = params.sort.as_deref().and_then(SortOption::parse);

        Self {
            region,
            currency,
            sort,
        }
    }
}
