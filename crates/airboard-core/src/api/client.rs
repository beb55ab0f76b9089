//! HTTP client for the airline lookup service.
//!
//! The service answers `GET {base}/airline/{code}` with
//! `{"response": [ {name, icao, ...}, ... ]}` on a match and
//! `{"response": "unknown airline"}` otherwise.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::models::AirlineRecord;

use super::{AirlineLookup, ApiError};

// ============================================================================
// Constants
// ============================================================================

/// Default base URL of the public lookup service.
pub const DEFAULT_API_BASE_URL: &str = "https://api.adsbdb.com/v0";

/// Default HTTP request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Deserialize)]
struct AirlineResponse {
    response: ResponseBody,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ResponseBody {
    Matches(Vec<AirlineRecord>),
    Message(String),
}

/// Client for the airline lookup service.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct AirlineClient {
    client: Client,
    base_url: String,
}

impl AirlineClient {
    /// Create a client against `base_url` with the given request timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn airline_url(&self, code: &str) -> String {
        format!("{}/airline/{}", self.base_url, code)
    }

    /// Look up one airline code and return its first match.
    ///
    /// The returned record has `identifier` set to `code`.
    pub async fn fetch_airline(&self, code: &str) -> Result<AirlineRecord, ApiError> {
        let code = code.trim();
        if code.is_empty() {
            return Err(ApiError::EmptyIdentifier);
        }

        let url = self.airline_url(code);
        debug!(url = %url, "Fetching airline");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ApiError::from_status(status, &body));
        }

        Self::first_match(code, &body)
    }

    /// Decode a response body and take `response[0]`.
    fn first_match(code: &str, body: &str) -> Result<AirlineRecord, ApiError> {
        let parsed: AirlineResponse = serde_json::from_str(body)
            .map_err(|e| ApiError::InvalidResponse(format!("{}: {}", code, e)))?;

        match parsed.response {
            ResponseBody::Matches(matches) => {
                let mut record = matches
                    .into_iter()
                    .next()
                    .ok_or_else(|| ApiError::NoMatch(code.to_string()))?;
                record.identifier = Some(code.to_string());
                Ok(record)
            }
            ResponseBody::Message(message) => {
                debug!(code = %code, message = %message, "Lookup service returned no match");
                Err(ApiError::NoMatch(code.to_string()))
            }
        }
    }
}

#[async_trait]
impl AirlineLookup for AirlineClient {
    async fn lookup(&self, code: &str) -> Option<AirlineRecord> {
        match self.fetch_airline(code).await {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(code = %code, error = %e, "Airline lookup failed");
                None
            }
        }
    }
}
