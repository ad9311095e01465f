//! HTTP middleware.
//!
//! - [`error_detail`] -- exposes internal error detail in development mode
//!   and turns panics into structured JSON 500s.

pub mod error_detail;
