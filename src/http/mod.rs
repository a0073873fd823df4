//! HTTP module
//!
//! Provides the [`PageFetcher`] seam and its `reqwest` implementation.
//!
//! # Features
//!
//! - **Typed failures**: transport errors, provider rate limits and other
//!   non-success statuses are kept apart
//! - **Configurable client**: timeout, user agent and default headers
//! - **Replaceable**: anything implementing [`PageFetcher`] can be plugged
//!   into a [`Searcher`](crate::pagination::Searcher)

mod client;

pub use client::{
    HttpClientConfig, HttpClientConfigBuilder, HttpFetcher, PageFetcher,
    DEFAULT_RATE_LIMIT_MARKER,
};

#[cfg(test)]
mod tests;
