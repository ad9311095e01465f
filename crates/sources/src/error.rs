use std::fmt;

/// Which upstream service an error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upstream {
    Countries,
    ExchangeRates,
}

impl fmt::Display for Upstream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Upstream::Countries => f.write_str("Countries API"),
            Upstream::ExchangeRates => f.write_str("Exchange rates API"),
        }
    }
}

/// Errors from fetching upstream data.
///
/// Every variant means the external source is unavailable or unusable for
/// this refresh; callers map all of them to a single "unavailable" condition.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The request exceeded its timeout.
    #[error("{upstream} request timed out")]
    Timeout { upstream: Upstream },

    /// The upstream answered with a non-2xx status.
    #[error("{upstream} returned {status}")]
    HttpStatus { upstream: Upstream, status: u16 },

    /// No response was received (DNS, connect, TLS, reset).
    #[error("{upstream} did not respond: {detail}")]
    NoResponse { upstream: Upstream, detail: String },

    /// The exchange service reported a non-success `result`.
    #[error("Exchange rates API returned non-success result: {result}")]
    Unsuccessful { result: String },

    /// The body did not match the expected schema.
    #[error("{upstream} returned a malformed response: {detail}")]
    Malformed { upstream: Upstream, detail: String },
}

impl SourceError {
    /// Classify a transport-level [`reqwest::Error`].
    pub fn from_reqwest(upstream: Upstream, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SourceError::Timeout { upstream }
        } else if err.is_decode() {
            SourceError::Malformed {
                upstream,
                detail: err.to_string(),
            }
        } else if let Some(status) = err.status() {
            SourceError::HttpStatus {
                upstream,
                status: status.as_u16(),
            }
        } else {
            SourceError::NoResponse {
                upstream,
                detail: err.to_string(),
            }
        }
    }
}
