//! Request handlers.
//!
//! Each submodule groups the handlers for one resource. Handlers delegate to
//! the refresh orchestrator or the repositories in `countryfx_db` and map
//! errors via [`AppError`](crate::error::AppError).

pub mod countries;
pub mod index;
pub mod status;
