// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::needless_pass_by_value)]

//! # scholar-pager
//!
//! Rate-limited, paginated search over Google Scholar.
//!
//! ## Features
//!
//! - **Admission control**: a FIFO queue that enforces a burst budget and a
//!   rolling quota at the same time
//! - **Full result sets**: reads the reported total from the first page and
//!   fetches the rest concurrently, merged back in page order
//! - **Navigation**: walk single pages with `next()` / `previous()`
//! - **Pluggable seams**: page fetching and HTML extraction sit behind traits
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use scholar_pager::{Query, ScholarConfig, Searcher, ThrottledQueue, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = ScholarConfig::default();
//!     let queue = ThrottledQueue::new(&config.throttle)?;
//!     let searcher = Searcher::from_config(&config, queue)?;
//!
//!     // One page, with navigation
//!     let page = searcher.search(&Query::new("deep learning")).await?;
//!     let second = page.next().await?;
//!
//!     // Every page
//!     let all = searcher.search_all(&Query::new("deep learning")).await?;
//!     println!("{} of {} results", all.len(), all.total);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                           Searcher                              │
//! │  search(query) → ResultSet        search_all(query) → ResultSet │
//! │  ResultSet::next() / previous()                                 │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//! ┌──────────────┬───────────────┴───┬───────────────┬─────────────┐
//! │   Throttle   │       HTTP        │    Extract    │    Query    │
//! ├──────────────┼───────────────────┼───────────────┼─────────────┤
//! │ Burst budget │ PageFetcher       │ ResultExtractor│ q / start  │
//! │ Rolling quota│ Rate-limit pages  │ Scholar rules │ Extra params│
//! │ FIFO         │ Status errors     │ Legacy/Current│             │
//! └──────────────┴───────────────────┴───────────────┴─────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for scholar-pager
pub mod error;

/// Records, authors and pages
pub mod types;

/// Dual-window admission-control queue
pub mod throttle;

/// HTTP page fetching
pub mod http;

/// HTML result extraction
pub mod extract;

/// Search URL construction
pub mod query;

/// Page planning, aggregation and result sets
pub mod pagination;

/// YAML configuration
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use config::ScholarConfig;
pub use extract::{ResultExtractor, ScholarExtractor};
pub use http::{HttpFetcher, PageFetcher};
pub use pagination::{ResultSet, Searcher};
pub use query::{Query, QueryEncoder};
pub use throttle::{ThrottleConfig, ThrottledQueue};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
