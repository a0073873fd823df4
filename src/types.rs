//! Common types used throughout scholar-pager
//!
//! Records and pages as produced by the result extractor. The scheduler and
//! aggregator only move these around; they never modify a record.

use serde::{Deserialize, Serialize};

// ============================================================================
// Records
// ============================================================================

/// An author credited on a search result
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Author {
    /// Display name (may be "et al.")
    pub name: String,
    /// Profile URL, empty when the author is not linked
    #[serde(default)]
    pub url: String,
}

impl Author {
    /// Create an unlinked author
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: String::new(),
        }
    }

    /// Create an author with a profile link
    pub fn linked(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }

    /// Whether the author has a profile link
    pub fn has_url(&self) -> bool {
        !self.url.is_empty()
    }
}

/// One search result
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Record {
    /// Result title
    pub title: String,
    /// Canonical URL of the result, empty when the result is not linked
    #[serde(default)]
    pub url: String,
    /// Authors in source order
    #[serde(default)]
    pub authors: Vec<Author>,
    /// Free-text snippet
    #[serde(default)]
    pub description: String,
    /// Citation count, 0 when absent
    #[serde(default)]
    pub cited_count: u64,
    /// Link to the list of citing documents
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cited_url: Option<String>,
    /// Link to related results
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_url: Option<String>,
    /// Link to the full-text document (usually a PDF)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdf_url: Option<String>,
}

// ============================================================================
// Pages
// ============================================================================

/// The extracted outcome of one page fetch
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Page {
    /// Records in source order
    pub records: Vec<Record>,
    /// Total result count reported by the provider, if it could be parsed
    #[serde(default)]
    pub total_results: Option<u64>,
    /// Absolute URL of the next page
    #[serde(default)]
    pub next_url: Option<String>,
    /// Absolute URL of the previous page
    #[serde(default)]
    pub prev_url: Option<String>,
}

impl Page {
    /// Create a page from records alone
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            records,
            ..Default::default()
        }
    }

    /// Set the reported total
    #[must_use]
    pub fn with_total(mut self, total: u64) -> Self {
        self.total_results = Some(total);
        self
    }

    /// Set the next page link
    #[must_use]
    pub fn with_next(mut self, url: impl Into<String>) -> Self {
        self.next_url = Some(url.into());
        self
    }

    /// Set the previous page link
    #[must_use]
    pub fn with_prev(mut self, url: impl Into<String>) -> Self {
        self.prev_url = Some(url.into());
        self
    }

    /// Number of records on this page
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the page has no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Total count to plan pagination with.
    ///
    /// Falls back to the number of records on this page when the provider's
    /// count was missing or unparseable, which means "no further pages".
    pub fn reported_total(&self) -> u64 {
        self.total_results.unwrap_or(self.records.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_author_constructors() {
        let author = Author::new("J Smith");
        assert!(!author.has_url());

        let author = Author::linked("A Doe", "https://scholar.google.com/citations?user=x");
        assert!(author.has_url());
    }

    #[test]
    fn test_reported_total_falls_back_to_page_size() {
        let page = Page::new(vec![Record::default(); 4]);
        assert_eq!(page.reported_total(), 4);

        let page = page.with_total(111);
        assert_eq!(page.reported_total(), 111);
    }

    #[test]
    fn test_record_serialization_skips_missing_links() {
        let record = Record {
            title: "Deep learning".to_string(),
            cited_count: 3,
            ..Default::default()
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["title"], "Deep learning");
        assert_eq!(json["cited_count"], 3);
        assert!(json.get("cited_url").is_none());
        assert!(json.get("pdf_url").is_none());
    }
}
