//! Status events produced by the monitor tick.
//!
//! The core only produces these; serialising and transporting them is the
//! job of an [`EventSink`](crate::app::ports::EventSink) adapter.

use core::time::Duration;

use super::state::Millivolts;

/// Numeric status code carried on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum StatusCode {
    Waiting = 0,
    FirstLoop = 1,
    LoopOk = 2,
    Rip = 3,
    NoLoopYet = 4,
}

impl StatusCode {
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

/// One discrete status event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopEvent {
    /// No edge seen yet (throttled heartbeat).
    Waiting { voltage: Millivolts },
    /// First edge since startup / reset.
    FirstLoop { voltage: Millivolts },
    /// Accepted edge; `interval` is the time since the previous one.
    LoopOk {
        voltage: Millivolts,
        interval: Duration,
    },
    /// Next edge overdue beyond tolerance. Emitted once per episode.
    Rip {
        voltage: Millivolts,
        elapsed: Duration,
    },
    /// Next edge not yet due (throttled heartbeat).
    NoLoopYet {
        voltage: Millivolts,
        elapsed: Duration,
    },
}

impl LoopEvent {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Waiting { .. } => StatusCode::Waiting,
            Self::FirstLoop { .. } => StatusCode::FirstLoop,
            Self::LoopOk { .. } => StatusCode::LoopOk,
            Self::Rip { .. } => StatusCode::Rip,
            Self::NoLoopYet { .. } => StatusCode::NoLoopYet,
        }
    }

    pub fn voltage(&self) -> Millivolts {
        match *self {
            Self::Waiting { voltage }
            | Self::FirstLoop { voltage }
            | Self::LoopOk { voltage, .. }
            | Self::Rip { voltage, .. }
            | Self::NoLoopYet { voltage, .. } => voltage,
        }
    }

    /// Measured loop interval; zero where not meaningful.
    pub fn interval(&self) -> Duration {
        match *self {
            Self::LoopOk { interval, .. } => interval,
            _ => Duration::ZERO,
        }
    }

    /// Time since the last accepted edge; zero where not meaningful.
    pub fn elapsed(&self) -> Duration {
        match *self {
            Self::Rip { elapsed, .. } | Self::NoLoopYet { elapsed, .. } => elapsed,
            _ => Duration::ZERO,
        }
    }

    /// Heartbeats are the throttled, informational events.
    pub fn is_heartbeat(&self) -> bool {
        matches!(self, Self::Waiting { .. } | Self::NoLoopYet { .. })
    }
}
