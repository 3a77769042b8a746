/// HTTP fetch client for the GIOS API.
///
/// One blocking GET per call; the orchestrator runs calls on its worker
/// pool so the caller never waits. No retry, no timeout beyond the
/// transport's default.

use tracing::debug;

use crate::ingest::gios::{Endpoint, API_BASE_URL};
use crate::model::TransportError;

/// Source of raw response bodies for the four endpoints.
///
/// Implementations must be shareable across worker threads.
pub trait Fetcher: Send + Sync + 'static {
    fn fetch(&self, endpoint: &Endpoint) -> Result<Vec<u8>, TransportError>;
}

/// Live fetcher backed by `reqwest::blocking`.
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl HttpFetcher {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new(API_BASE_URL)
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, endpoint: &Endpoint) -> Result<Vec<u8>, TransportError> {
        let url = endpoint.url(&self.base_url);
        debug!(%url, "fetching {}", endpoint.name());

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .map_err(|e| TransportError::Request {
                url: url.clone(),
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(TransportError::Status {
                url,
                status: response.status().as_u16(),
            });
        }

        let body = response.bytes().map_err(|e| TransportError::Request {
            url: url.clone(),
            message: e.to_string(),
        })?;

        Ok(body.to_vec())
    }
}
