//! Configuration for scholar-pager
//!
//! Everything the binary needs to build a [`Searcher`](crate::pagination::Searcher)
//! is described by [`ScholarConfig`], loaded from YAML. Every field has a
//! default, so an empty document is a valid configuration.

use crate::error::{Error, Result};
use crate::extract::{ExtractionRules, RuleVersion, ScholarExtractor, DEFAULT_LINK_BASE};
use crate::http::{HttpClientConfig, DEFAULT_RATE_LIMIT_MARKER};
use crate::pagination::DEFAULT_PAGE_SIZE;
use crate::query::QueryEncoder;
use crate::throttle::ThrottleConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Google Scholar search endpoint
pub const DEFAULT_BASE_URL: &str = "https://scholar.google.com/scholar";

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete configuration loaded from YAML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScholarConfig {
    /// Search endpoint
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Extra query parameters sent with every search (e.g. `hl: en`)
    #[serde(default)]
    pub params: BTreeMap<String, String>,

    /// Admission-control budgets
    #[serde(default)]
    pub throttle: ThrottleConfig,

    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Pagination settings
    #[serde(default)]
    pub pagination: PaginationConfig,

    /// Extraction settings
    #[serde(default)]
    pub extractor: ExtractorConfig,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl Default for ScholarConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            params: BTreeMap::new(),
            throttle: ThrottleConfig::default(),
            http: HttpConfig::default(),
            pagination: PaginationConfig::default(),
            extractor: ExtractorConfig::default(),
        }
    }
}

impl ScholarConfig {
    /// Load and validate a configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::config(format!("Config file '{}' not found", path.display()))
            } else {
                Error::config(format!(
                    "Failed to read config file '{}': {}",
                    path.display(),
                    e
                ))
            }
        })?;
        Self::from_yaml_str(&content)
    }

    /// Parse and validate a YAML document
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        // serde_yaml rejects an empty document; treat it as all defaults
        let config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Serialize the effective configuration as YAML
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Check values that would make the searcher unusable
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.base_url)
            .map_err(|e| Error::invalid_value("base_url", e.to_string()))?;
        Url::parse(&self.extractor.link_base)
            .map_err(|e| Error::invalid_value("extractor.link_base", e.to_string()))?;

        self.throttle.validate()?;

        if self.http.timeout_secs == 0 {
            return Err(Error::invalid_value("http.timeout_secs", "must be at least 1"));
        }
        if self.pagination.page_size == 0 {
            return Err(Error::invalid_value(
                "pagination.page_size",
                "must be at least 1",
            ));
        }
        Ok(())
    }

    /// Query encoder for the configured endpoint and parameters
    pub fn encoder(&self) -> Result<QueryEncoder> {
        Ok(QueryEncoder::new(&self.base_url)?.params(self.params.clone()))
    }
}

// ============================================================================
// HTTP
// ============================================================================

/// HTTP client settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Text identifying the provider's rate-limit page
    #[serde(default = "default_rate_limit_marker")]
    pub rate_limit_marker: String,

    /// Headers sent with every request
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            user_agent: default_user_agent(),
            rate_limit_marker: default_rate_limit_marker(),
            headers: BTreeMap::new(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("scholar-pager/{}", env!("CARGO_PKG_VERSION"))
}

fn default_rate_limit_marker() -> String {
    DEFAULT_RATE_LIMIT_MARKER.to_string()
}

impl HttpConfig {
    /// Client config for [`HttpFetcher`](crate::http::HttpFetcher)
    pub fn client_config(&self) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder()
            .timeout(Duration::from_secs(self.timeout_secs))
            .user_agent(&self.user_agent)
            .rate_limit_marker(&self.rate_limit_marker);
        for (key, value) in &self.headers {
            builder = builder.header(key, value);
        }
        builder.build()
    }
}

// ============================================================================
// Pagination
// ============================================================================

/// Pagination settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Results per provider page
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Most follow-up pages a full search may fetch
    #[serde(default)]
    pub max_pages: Option<u32>,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            max_pages: None,
        }
    }
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

// ============================================================================
// Extraction
// ============================================================================

/// Extraction settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Markup revision to extract
    #[serde(default)]
    pub rules: RuleVersion,

    /// Base that relative links are resolved against
    #[serde(default = "default_link_base")]
    pub link_base: String,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            rules: RuleVersion::default(),
            link_base: default_link_base(),
        }
    }
}

fn default_link_base() -> String {
    DEFAULT_LINK_BASE.to_string()
}

impl ExtractorConfig {
    /// Build the configured extractor
    pub fn build(&self) -> Result<ScholarExtractor> {
        ScholarExtractor::with_rules(ExtractionRules::for_version(self.rules), &self.link_base)
    }
}
