//! Search queries and request URL construction
//!
//! A [`Query`] is the search text plus a result offset. The
//! [`QueryEncoder`] turns it into the provider's request URL, URL-encoding
//! the free text.

use crate::error::Result;
use std::collections::BTreeMap;
use url::Url;

/// Query parameter carrying the search text
pub const QUERY_PARAM: &str = "q";

/// Query parameter carrying the result offset
pub const OFFSET_PARAM: &str = "start";

/// An immutable search query
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Query {
    text: String,
    start: u32,
}

impl Query {
    /// Create a query for the first page
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            start: 0,
        }
    }

    /// Create a query starting at the given result offset
    pub fn with_start(text: impl Into<String>, start: u32) -> Self {
        Self {
            text: text.into(),
            start,
        }
    }

    /// Search text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Result offset
    pub fn start(&self) -> u32 {
        self.start
    }

    /// A copy of this query moved `offset` results further
    #[must_use]
    pub fn offset_by(&self, offset: u32) -> Self {
        Self {
            text: self.text.clone(),
            start: self.start.saturating_add(offset),
        }
    }
}

impl std::fmt::Display for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.start == 0 {
            write!(f, "{:?}", self.text)
        } else {
            write!(f, "{:?} (start={})", self.text, self.start)
        }
    }
}

/// Builds request URLs for queries
#[derive(Debug, Clone)]
pub struct QueryEncoder {
    base_url: Url,
    params: BTreeMap<String, String>,
}

impl QueryEncoder {
    /// Create an encoder for the given search endpoint
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            base_url: Url::parse(base_url)?,
            params: BTreeMap::new(),
        })
    }

    /// Add a fixed parameter sent with every request (e.g. `hl=en`)
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Add several fixed parameters
    #[must_use]
    pub fn params<I, K, V>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (key, value) in params {
            self.params.insert(key.into(), value.into());
        }
        self
    }

    /// Search endpoint
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Request URL for a query
    pub fn url(&self, query: &Query) -> Url {
        let mut url = self.base_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair(QUERY_PARAM, query.text());
            if query.start() > 0 {
                pairs.append_pair(OFFSET_PARAM, &query.start().to_string());
            }
            for (key, value) in &self.params {
                pairs.append_pair(key, value);
            }
        }
        url
    }
}
