// # HTTP IP Source
//
// This crate provides the IP-echo source for the DDNS updater.
//
// ## Purpose
//
// Asks a public "what is my IP" service for the address the rest of the
// internet sees this network as. The service must answer a plain GET with
// the IPv4 address as the response body.
//
// ## Behavior
//
// - One GET per `current()` call, no retry, no caching
// - Non-2xx responses and transport errors fail the lookup
// - The body is handed back verbatim; trimming and validation belong to
//   `ddns_core::IpResolver`

use ddns_core::traits::IpSource;
use ddns_core::{Error, Result};

use std::time::Duration;

/// Default IP-echo service
pub const DEFAULT_IP_ECHO_URL: &str = "http://checkip.amazonaws.com/";

/// Default HTTP timeout for the lookup (10 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP-based IP source
#[derive(Debug, Clone)]
pub struct HttpIpSource {
    /// URL to fetch the IP from
    url: String,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpIpSource {
    /// Create a new HTTP IP source
    ///
    /// # Parameters
    ///
    /// - `url`: IP-echo URL (e.g., "http://checkip.amazonaws.com/")
    pub fn new(url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(url, DEFAULT_HTTP_TIMEOUT)
    }

    /// Create with a custom request timeout
    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let url = url.into();
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(Error::config(format!(
                "IP echo URL must use HTTP or HTTPS scheme. Got: {}",
                url
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { url, client })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Default for HttpIpSource {
    fn default() -> Self {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .unwrap_or_default();

        Self {
            url: DEFAULT_IP_ECHO_URL.to_string(),
            client,
        }
    }
}

#[async_trait::async_trait]
impl IpSource for HttpIpSource {
    async fn current(&self) -> Result<String> {
        tracing::debug!("Fetching public IP from {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| Error::http(format!("Request to {} failed: {}", self.url, e)))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("IP echo service {} answered {}", self.url, status);
            return Err(Error::http(format!("{} returned {}", self.url, status)));
        }

        response
            .text()
            .await
            .map_err(|e| Error::http(format!("Failed to read response from {}: {}", self.url, e)))
    }

    fn source_name(&self) -> &str {
        &self.url
    }
}
