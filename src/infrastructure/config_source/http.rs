//! # HTTP Config Fetcher
//!
//! [`ConfigFetcher`] backed by the config service REST API.
//!
//! ```text
//! GET {base_url}/service-configs/active/{service_id}
//!   200 -> ServiceConfig JSON
//!   404 -> no active document
//!   *   -> FetchError
//! ```

use crate::domain::entities::service_config::ServiceConfig;
use crate::domain::value_objects::ServiceId;
use crate::infrastructure::config_source::traits::{ConfigFetcher, FetchError, FetchResult};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;

/// Default request timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

/// Fetches active configuration documents over HTTP.
#[derive(Debug, Clone)]
pub struct HttpConfigFetcher {
    client: Client,
    base_url: String,
    timeout_ms: u64,
}

impl HttpConfigFetcher {
    /// Creates a fetcher for the config service at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Internal` if the client cannot be created.
    pub fn new(base_url: impl Into<String>, timeout_ms: u64) -> FetchResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| FetchError::internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout_ms,
        })
    }

    /// Returns the base URL.
    #[inline]
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the configured timeout in milliseconds.
    #[inline]
    #[must_use]
    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    fn active_url(&self, service_id: &ServiceId) -> String {
        format!("{}/service-configs/active/{}", self.base_url, service_id)
    }

    async fn handle_response(&self, response: Response) -> FetchResult<Option<ServiceConfig>> {
        let status = response.status();

        if status == StatusCode::NOT_FOUND || status == StatusCode::NO_CONTENT {
            return Ok(None);
        }

        if status.is_success() {
            response
                .json::<ServiceConfig>()
                .await
                .map(Some)
                .map_err(|e| FetchError::protocol(format!("Failed to parse response: {}", e)))
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(FetchError::status(status.as_u16(), body))
        }
    }

    fn map_reqwest_error(&self, error: reqwest::Error) -> FetchError {
        if error.is_timeout() {
            FetchError::timeout(format!("Request timed out after {}ms", self.timeout_ms))
        } else if error.is_connect() {
            FetchError::connection(format!("Connection failed: {}", error))
        } else {
            FetchError::connection(format!("HTTP request failed: {}", error))
        }
    }
}

#[async_trait]
impl ConfigFetcher for HttpConfigFetcher {
    async fn fetch_active(&self, service_id: &ServiceId) -> FetchResult<Option<ServiceConfig>> {
        let url = self.active_url(service_id);
        tracing::debug!(service_id = %service_id, url = %url, "fetching active config");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.map_reqwest_error(e))?;

        self.handle_response(response).await
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn base_url_is_trimmed() {
        let fetcher = HttpConfigFetcher::new("http://configs.local/api/", 2000).unwrap();
        assert_eq!(fetcher.base_url(), "http://configs.local/api");
        assert_eq!(fetcher.timeout_ms(), 2000);
        assert_eq!(
            fetcher.active_url(&ServiceId::new("Drain_Service")),
            "http://configs.local/api/service-configs/active/drain_service"
        );
    }
}
