//! Domain types and pure logic for the country currency service.
//!
//! Nothing in this crate touches the network or the database: the merge
//! transform, filter/sort normalization, and summary image rendering all
//! operate on plain values so they can be tested in isolation.

pub mod country;
pub mod error;
pub mod font;
pub mod query;
pub mod summary;
pub mod types;
