//! Admission control module
//!
//! Dual-window request throttling: a short burst interval and a longer
//! rolling quota, enforced together over a single FIFO queue.
//!
//! # Overview
//!
//! - **Burst budget**: at most `max_per_interval` tasks per `interval`
//! - **Rolling quota**: at most `quota_per_window` tasks per `window`,
//!   refilled at fixed window boundaries while there is work to do
//! - **FIFO**: tasks are admitted in the order they were enqueued
//!
//! One queue is shared by every search that targets the same provider, so
//! the combined request rate stays inside the provider's limits.

mod queue;
mod types;

pub use queue::ThrottledQueue;
pub use types::ThrottleConfig;
