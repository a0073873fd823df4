//! Pagination module
//!
//! Turns one search into a complete, ordered result set.
//!
//! # Overview
//!
//! [`Searcher`] fetches the first page of a query, reads the reported total,
//! and works out a [`PagePlan`] for the rest. Follow-up pages are requested
//! concurrently, each admitted individually through the shared
//! [`ThrottledQueue`](crate::throttle::ThrottledQueue), and merged back in
//! page order no matter which finishes first.
//!
//! A single-page search returns a [`ResultSet`] that can walk to the
//! neighbouring pages with [`ResultSet::next`] and [`ResultSet::previous`].

mod result_set;
mod searcher;
mod types;

pub use result_set::ResultSet;
pub use searcher::{Searcher, DEFAULT_PAGE_SIZE};
pub use types::PagePlan;
