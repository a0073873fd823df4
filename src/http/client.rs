//! HTTP page fetcher
//!
//! Fetches raw page bodies and classifies failures:
//! - Connection and timeout failures become [`Error::Transport`]
//! - The provider's rate-limit page becomes [`Error::RateLimited`]
//! - Any other non-success status becomes [`Error::HttpStatus`]
//!
//! No retries happen here. Pacing is the admission queue's job and backing
//! off after a rate-limit signal is the caller's.

use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

/// Body text the provider uses on its rate-limit page
pub const DEFAULT_RATE_LIMIT_MARKER: &str = "unusual traffic";

/// Longest body excerpt kept in status errors
const MAX_ERROR_BODY: usize = 512;

/// Fetches the raw content behind a URL
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch the page at `url` and return its body
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// Configuration for the HTTP fetcher
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Request timeout
    pub timeout: Duration,
    /// User agent string
    pub user_agent: String,
    /// Default headers for all requests
    pub default_headers: HashMap<String, String>,
    /// Text identifying the provider's rate-limit page on a 503
    pub rate_limit_marker: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: format!("scholar-pager/{}", env!("CARGO_PKG_VERSION")),
            default_headers: HashMap::new(),
            rate_limit_marker: DEFAULT_RATE_LIMIT_MARKER.to_string(),
        }
    }
}

impl HttpClientConfig {
    /// Create a new config builder
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }
}

/// Builder for HTTP client config
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Add a default header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Set the rate-limit page marker
    pub fn rate_limit_marker(mut self, marker: impl Into<String>) -> Self {
        self.config.rate_limit_marker = marker.into();
        self
    }

    /// Build the config
    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// `reqwest`-backed page fetcher
pub struct HttpFetcher {
    client: Client,
    config: HttpClientConfig,
}

impl HttpFetcher {
    /// Create a fetcher with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(HttpClientConfig::default())
    }

    /// Create a fetcher with custom configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self { client, config })
    }

    /// Get the fetcher configuration
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// Turn a non-success response into the matching error
    fn classify_failure(&self, status: StatusCode, body: String) -> Error {
        let code = status.as_u16();

        if status == StatusCode::TOO_MANY_REQUESTS
            || (status == StatusCode::SERVICE_UNAVAILABLE
                && body.contains(&self.config.rate_limit_marker))
        {
            warn!("Provider rate limit hit (HTTP {code})");
            return Error::rate_limited(code, excerpt(&body));
        }

        Error::http_status(code, excerpt(&body))
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let mut req = self.client.get(url);
        for (key, value) in &self.config.default_headers {
            req = req.header(key.as_str(), value.as_str());
        }

        let response = req.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(self.classify_failure(status, body));
        }

        let body = response.text().await?;
        debug!("Fetched {} ({} bytes)", url, body.len());
        Ok(body)
    }
}

impl std::fmt::Debug for HttpFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpFetcher")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Trim a response body for inclusion in an error
fn excerpt(body: &str) -> String {
    let body = body.trim();
    match body.char_indices().nth(MAX_ERROR_BODY) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod client_tests {
    use super::*;

    #[test]
    fn test_excerpt_truncates_long_bodies() {
        assert_eq!(excerpt("  short  "), "short");

        let long = "x".repeat(MAX_ERROR_BODY + 10);
        let cut = excerpt(&long);
        assert_eq!(cut.len(), MAX_ERROR_BODY + 3);
        assert!(cut.ends_with("..."));
    }
}
