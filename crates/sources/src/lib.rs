//! Clients for the two upstream data sources: the countries directory and
//! the currency exchange-rate service.
//!
//! Responses are validated at this boundary. A payload that does not match
//! the expected shape surfaces as [`SourceError::Malformed`] instead of
//! reaching the transform.

pub mod client;
pub mod error;

pub use client::{CountrySource, SourceClient, SourceConfig, UpstreamHealth};
pub use error::{SourceError, Upstream};
