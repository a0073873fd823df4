//! Result extraction module
//!
//! Turns rendered search result pages into [`Page`](crate::types::Page)s.
//!
//! # Overview
//!
//! Extraction is a pure function from markup to records, kept behind the
//! [`ResultExtractor`] trait so the scheduler never depends on one site's
//! HTML. [`ScholarExtractor`] implements it for Google Scholar with a
//! versioned set of [`ExtractionRules`].

mod scholar;
mod types;

pub use scholar::{parse_result_count, ScholarExtractor, DEFAULT_LINK_BASE, ET_AL};
pub use types::{ExtractionRules, FooterRule, ResultExtractor, RuleVersion};
