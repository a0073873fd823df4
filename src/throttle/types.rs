//! Throttle configuration

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Intervals shorter than this tend to be swamped by timer imprecision
pub const MIN_RECOMMENDED_INTERVAL: Duration = Duration::from_millis(200);

/// Configuration for the admission-control queue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThrottleConfig {
    /// Maximum number of tasks released per interval
    pub max_per_interval: u32,
    /// Burst interval in milliseconds
    pub interval_ms: u64,
    /// Maximum number of tasks released per window
    pub quota_per_window: u32,
    /// Quota refill window in milliseconds
    pub window_ms: u64,
    /// Spread the burst budget evenly across the interval
    pub evenly_spaced: bool,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        // Google Scholar tolerates roughly 5 requests per second and 200 per minute
        Self {
            max_per_interval: 5,
            interval_ms: 1000,
            quota_per_window: 200,
            window_ms: 60_000,
            evenly_spaced: false,
        }
    }
}

impl ThrottleConfig {
    /// Create a new throttle config
    pub fn new(max_per_interval: u32, interval: Duration) -> Self {
        Self {
            max_per_interval,
            interval_ms: interval.as_millis() as u64,
            ..Default::default()
        }
    }

    /// Set the rolling quota
    #[must_use]
    pub fn with_quota(mut self, quota_per_window: u32, window: Duration) -> Self {
        self.quota_per_window = quota_per_window;
        self.window_ms = window.as_millis() as u64;
        self
    }

    /// Enable or disable evenly spaced admission
    #[must_use]
    pub fn evenly_spaced(mut self, evenly_spaced: bool) -> Self {
        self.evenly_spaced = evenly_spaced;
        self
    }

    /// Burst interval as a duration
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    /// Quota window as a duration
    pub fn window(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }

    /// Interval and burst size actually enforced by the queue.
    ///
    /// In evenly spaced mode the interval is divided by the burst size and
    /// one task is released per sub-interval.
    pub fn effective_burst(&self) -> (Duration, u32) {
        if self.evenly_spaced && self.max_per_interval > 0 {
            (self.interval() / self.max_per_interval, 1)
        } else {
            (self.interval(), self.max_per_interval)
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.max_per_interval == 0 {
            return Err(Error::invalid_value(
                "throttle.max_per_interval",
                "must be at least 1",
            ));
        }
        if self.interval_ms == 0 {
            return Err(Error::invalid_value(
                "throttle.interval_ms",
                "must be at least 1",
            ));
        }
        if self.quota_per_window == 0 {
            return Err(Error::invalid_value(
                "throttle.quota_per_window",
                "must be at least 1",
            ));
        }
        if self.window_ms == 0 {
            return Err(Error::invalid_value("throttle.window_ms", "must be at least 1"));
        }
        Ok(())
    }
}
