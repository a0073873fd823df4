//! Search scheduling and page aggregation

use super::result_set::ResultSet;
use super::types::PagePlan;
use crate::config::ScholarConfig;
use crate::error::Result;
use crate::extract::ResultExtractor;
use crate::http::{HttpFetcher, PageFetcher};
use crate::query::{Query, QueryEncoder};
use crate::throttle::ThrottledQueue;
use crate::types::Page;
use futures::future::try_join_all;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Results per provider page
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Runs searches against one provider through a shared admission queue.
///
/// Cloning is cheap; clones share the queue, fetcher and extractor.
#[derive(Clone)]
pub struct Searcher {
    queue: ThrottledQueue,
    fetcher: Arc<dyn PageFetcher>,
    extractor: Arc<dyn ResultExtractor>,
    encoder: Arc<QueryEncoder>,
    page_size: u32,
    max_pages: Option<u32>,
}

impl Searcher {
    /// Create a searcher from its collaborators
    pub fn new(
        queue: ThrottledQueue,
        fetcher: impl PageFetcher + 'static,
        extractor: impl ResultExtractor + 'static,
        encoder: QueryEncoder,
    ) -> Self {
        Self {
            queue,
            fetcher: Arc::new(fetcher),
            extractor: Arc::new(extractor),
            encoder: Arc::new(encoder),
            page_size: DEFAULT_PAGE_SIZE,
            max_pages: None,
        }
    }

    /// Build the HTTP fetcher, extractor and encoder described by `config`.
    ///
    /// The queue is passed in so several searchers can share one budget.
    pub fn from_config(config: &ScholarConfig, queue: ThrottledQueue) -> Result<Self> {
        let fetcher = HttpFetcher::with_config(config.http.client_config())?;
        let extractor = config.extractor.build()?;
        let searcher = Self::new(queue, fetcher, extractor, config.encoder()?)
            .with_page_size(config.pagination.page_size)
            .with_max_pages(config.pagination.max_pages);
        Ok(searcher)
    }

    /// Set the number of results per provider page
    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Cap the follow-up pages fetched by [`search_all`](Self::search_all)
    #[must_use]
    pub fn with_max_pages(mut self, max_pages: Option<u32>) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Results per provider page
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Admission queue shared by this searcher
    pub fn queue(&self) -> &ThrottledQueue {
        &self.queue
    }

    /// Fetch one page of results.
    ///
    /// The returned set can walk to neighbouring pages.
    pub async fn search(&self, query: &Query) -> Result<ResultSet> {
        info!(query = %query, "Searching");
        self.fetch_url(self.encoder.url(query).as_str()).await
    }

    /// Fetch every page of results and merge them in page order.
    ///
    /// Follow-up pages are requested concurrently; the first failure fails
    /// the whole search. The merged set has no navigation links.
    pub async fn search_all(&self, query: &Query) -> Result<ResultSet> {
        info!(query = %query, "Searching all pages");
        let first = self.fetch_page(self.encoder.url(query).as_str()).await?;
        let total = first.reported_total();

        let plan = PagePlan::new(total, first.len() as u64, self.page_size).capped(self.max_pages);
        if plan.is_truncated() {
            warn!(
                total,
                max_pages = ?self.max_pages,
                "Result count exceeds the page cap, fetching a partial set"
            );
        }
        if plan.is_complete() {
            debug!(total, records = first.len(), "First page holds every result");
            return Ok(ResultSet::complete(first.records, total, 1, self.clone()));
        }

        info!(
            total,
            remaining = plan.remaining(),
            pages = plan.pages(),
            "Fetching follow-up pages"
        );

        let follow_ups = plan.offsets().map(|offset| {
            let url = self.encoder.url(&query.offset_by(offset));
            async move { self.fetch_page(url.as_str()).await }
        });
        let pages = try_join_all(follow_ups).await?;

        let mut records = first.records;
        for page in pages {
            records.extend(page.records);
        }

        debug!(total, records = records.len(), "Merged follow-up pages");
        Ok(ResultSet::complete(
            records,
            total,
            plan.pages() as usize + 1,
            self.clone(),
        ))
    }

    /// Fetch a page by absolute URL as a one-page result set
    pub async fn fetch_url(&self, url: &str) -> Result<ResultSet> {
        let page = self.fetch_page(url).await?;
        Ok(ResultSet::from_page(page, self.clone()))
    }

    async fn fetch_page(&self, url: &str) -> Result<Page> {
        let body = self
            .queue
            .run(|| async {
                debug!(url, "Fetching page");
                self.fetcher.fetch(url).await
            })
            .await?;
        self.extractor.extract(&body)
    }
}

impl fmt::Debug for Searcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Searcher")
            .field("queue", &self.queue)
            .field("base_url", &self.encoder.base_url().as_str())
            .field("page_size", &self.page_size)
            .field("max_pages", &self.max_pages)
            .finish_non_exhaustive()
    }
}
