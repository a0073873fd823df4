//! Pagination planning types

/// Follow-up pages needed after the first page of a search.
///
/// Offsets are relative to the original query: page `i` of the plan is the
/// original query shifted by `i * page_size` results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagePlan {
    remaining: u64,
    page_size: u32,
    pages: u32,
    truncated: bool,
}

impl PagePlan {
    /// Plan follow-ups for a reported total and a first page of
    /// `first_page_len` records
    pub fn new(total: u64, first_page_len: u64, page_size: u32) -> Self {
        let page_size = page_size.max(1);
        let remaining = total.saturating_sub(first_page_len);
        let pages = remaining.div_ceil(u64::from(page_size));

        Self {
            remaining,
            page_size,
            pages: u32::try_from(pages).unwrap_or(u32::MAX),
            truncated: false,
        }
    }

    /// Limit the number of follow-up pages
    #[must_use]
    pub fn capped(mut self, max_pages: Option<u32>) -> Self {
        if let Some(max) = max_pages {
            if self.pages > max {
                self.pages = max;
                self.truncated = true;
            }
        }
        self
    }

    /// Results not covered by the first page
    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    /// Number of follow-up pages to fetch
    pub fn pages(&self) -> u32 {
        self.pages
    }

    /// Whether a cap dropped pages the total called for
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// True when the first page already holds everything
    pub fn is_complete(&self) -> bool {
        self.pages == 0
    }

    /// Result offsets of the follow-up pages, in page order
    pub fn offsets(&self) -> impl Iterator<Item = u32> {
        let page_size = self.page_size;
        (1..=self.pages).map(move |index| index.saturating_mul(page_size))
    }
}
