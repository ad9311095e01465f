//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods
//! that accept `&PgPool` as the first argument.

pub mod country_repo;
pub mod metadata_repo;

pub use country_repo::CountryRepo;
pub use metadata_repo::MetadataRepo;
