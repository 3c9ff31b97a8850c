//! The single mutable record owned by the sampling loop.
//!
//! `BeltMonitorState` is created once at startup and mutated only by
//! [`BeltMonitor::tick`](super::BeltMonitor::tick). The indicator loop never
//! sees it directly; it reads the two published flags through
//! [`MonitorFlags`](crate::indicator::MonitorFlags).

use core::time::Duration;

/// Calibrated sense-line voltage in millivolts.
pub type Millivolts = u32;

/// Monotonic time since boot, millisecond resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Boot instant.
    pub const ZERO: Self = Self(0);

    pub const fn from_millis(ms: u64) -> Self {
        Self(ms)
    }

    pub const fn as_millis(self) -> u64 {
        self.0
    }

    /// Time elapsed since `earlier`, zero if `earlier` is in the future.
    pub fn saturating_since(self, earlier: Timestamp) -> Duration {
        Duration::from_millis(self.0.saturating_sub(earlier.0))
    }
}

/// Which of the mutually exclusive monitor conditions currently holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorPhase {
    /// No edge seen since startup or reset.
    Waiting,
    /// One edge seen, no loop interval measured yet.
    FirstLoop,
    /// Loops are arriving (or the next one is still within tolerance).
    Running,
    /// Rip alarm latched.
    Ripped,
}

/// Loop-detection state. Field meanings follow the monitor's tick algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BeltMonitorState {
    /// Last good sample, used for differencing.
    pub previous_voltage: Millivolts,
    /// Any edge observed since startup / reset.
    pub first_drop_detected: bool,
    /// Time of the most recent accepted edge.
    pub last_drop_time: Timestamp,
    /// Expected loop period. Never zero.
    pub previous_interval: Duration,
    /// Latched alarm.
    pub belt_ripped: bool,
    /// `Rip` already emitted for the current episode.
    pub rip_sent: bool,
    /// Heartbeat throttle.
    pub last_send_time: Timestamp,
}

impl BeltMonitorState {
    pub fn new(default_interval: Duration) -> Self {
        debug_assert!(!default_interval.is_zero());
        Self {
            previous_voltage: 0,
            first_drop_detected: false,
            last_drop_time: Timestamp::ZERO,
            previous_interval: default_interval,
            belt_ripped: false,
            rip_sent: false,
            last_send_time: Timestamp::ZERO,
        }
    }

    /// `true` when the invariants between the latch flags hold.
    pub fn is_consistent(&self) -> bool {
        !self.previous_interval.is_zero()
            && (!self.rip_sent || self.belt_ripped)
            && (!self.belt_ripped || self.first_drop_detected)
    }
}
