//! Airline lookup module.
//!
//! `AirlineClient` talks to the public lookup service and reports failures
//! as `ApiError`. The `AirlineLookup` trait is the infallible seam the
//! synchronizer depends on: every failure becomes `None` at this boundary.

pub mod client;
pub mod error;

use async_trait::async_trait;

use crate::models::AirlineRecord;

pub use client::{AirlineClient, DEFAULT_API_BASE_URL, DEFAULT_REQUEST_TIMEOUT_SECS};
pub use error::ApiError;

/// Source of airline records keyed by lookup code.
///
/// Implementations must not fail: transport and parse errors are logged and
/// reported as `None`.
#[async_trait]
pub trait AirlineLookup: Send + Sync {
    async fn lookup(&self, code: &str) -> Option<AirlineRecord>;
}
