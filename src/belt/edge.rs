//! Drop-threshold edge detection with a minimum edge spacing.

use core::time::Duration;

use super::state::Millivolts;

/// Decides whether a voltage step is a marker pass.
#[derive(Debug, Clone, Copy)]
pub struct EdgeDetector {
    threshold_mv: u32,
    min_spacing: Duration,
}

impl EdgeDetector {
    pub fn new(threshold_mv: u32, min_spacing: Duration) -> Self {
        Self {
            threshold_mv,
            min_spacing,
        }
    }

    /// Signed drop from `previous` to `current` strictly exceeds the threshold.
    /// Rises never count.
    pub fn is_drop(&self, previous: Millivolts, current: Millivolts) -> bool {
        let diff = i64::from(previous) - i64::from(current);
        diff > i64::from(self.threshold_mv)
    }

    /// A candidate edge `since_last` after the previous accepted one is a
    /// second physical pass only if it is strictly further apart than one
    /// sampling period. Anything closer is ringing.
    pub fn accepts(&self, since_last: Duration) -> bool {
        since_last > self.min_spacing
    }
}
