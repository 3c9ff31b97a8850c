//! Expected loop period tracking.
//!
//! The estimate is the most recently confirmed interval, with no smoothing.
//! It follows gradual speed changes immediately; the flip side is that one
//! long interval widens the rip tolerance for the next loop as well.

use core::time::Duration;

/// Tracks the expected inter-edge period.
#[derive(Debug, Clone, Copy)]
pub struct IntervalEstimator {
    default_interval: Duration,
}

impl IntervalEstimator {
    pub fn new(default_interval: Duration) -> Self {
        Self { default_interval }
    }

    /// Estimate used before any interval has been measured.
    pub fn initial(&self) -> Duration {
        self.default_interval
    }

    /// Replace `estimate` with the latest confirmed interval.
    ///
    /// Accepted intervals always exceed the debounce window, so this can
    /// never store a zero estimate.
    pub fn record(&self, estimate: &mut Duration, observed: Duration) {
        debug_assert!(!observed.is_zero());
        *estimate = observed;
    }
}
