//! Result sets returned by a search

use super::searcher::Searcher;
use crate::error::{Direction, Error, Result};
use crate::types::{Page, Record};
use serde::Serialize;

/// Records gathered by one search, with optional page navigation.
///
/// Sets built from a single page keep that page's links, so [`next`] and
/// [`previous`] fetch the neighbouring pages through the same searcher and
/// queue. Sets merged by [`Searcher::search_all`] carry no links.
///
/// [`next`]: ResultSet::next
/// [`previous`]: ResultSet::previous
#[derive(Debug, Clone, Serialize)]
pub struct ResultSet {
    /// Records in page order
    pub records: Vec<Record>,
    /// Total reported by the first page
    pub total: u64,
    /// Link to the page after the last one fetched
    pub next_url: Option<String>,
    /// Link to the page before the last one fetched
    pub prev_url: Option<String>,
    /// Pages that went into this set
    pub pages_fetched: usize,
    #[serde(skip)]
    searcher: Searcher,
}

impl ResultSet {
    pub(crate) fn from_page(page: Page, searcher: Searcher) -> Self {
        let total = page.reported_total();
        Self {
            records: page.records,
            total,
            next_url: page.next_url,
            prev_url: page.prev_url,
            pages_fetched: 1,
            searcher,
        }
    }

    pub(crate) fn complete(
        records: Vec<Record>,
        total: u64,
        pages_fetched: usize,
        searcher: Searcher,
    ) -> Self {
        Self {
            records,
            total,
            next_url: None,
            prev_url: None,
            pages_fetched,
            searcher,
        }
    }

    /// Number of records held
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the set holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether [`next`](Self::next) can fetch anything
    pub fn has_next(&self) -> bool {
        self.next_url.is_some()
    }

    /// Whether [`previous`](Self::previous) can fetch anything
    pub fn has_previous(&self) -> bool {
        self.prev_url.is_some()
    }

    /// Fetch the following page
    pub async fn next(&self) -> Result<ResultSet> {
        self.follow(self.next_url.as_deref(), Direction::Next).await
    }

    /// Fetch the preceding page
    pub async fn previous(&self) -> Result<ResultSet> {
        self.follow(self.prev_url.as_deref(), Direction::Previous).await
    }

    async fn follow(&self, url: Option<&str>, direction: Direction) -> Result<ResultSet> {
        let url = url.ok_or_else(|| Error::no_adjacent_page(direction))?;
        self.searcher.fetch_url(url).await
    }
}
