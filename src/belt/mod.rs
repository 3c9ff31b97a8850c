//! Belt loop detection and rip alarm: the monitor core.
//!
//! ```text
//!  voltage ──▶ EdgeDetector ──┬─[first edge]──────────────▶ FirstLoop
//!                             ├─[edge, spaced]─▶ Interval ─▶ LoopOk
//!                             ├─[edge, too soon]──────────▶ (ignored)
//!                             └─[no edge]──▶ RipEvaluator ─▶ Rip / NoLoopYet
//!                                             (or Waiting before any edge)
//! ```
//!
//! [`BeltMonitor::tick`] is called once per sampling period with the
//! sampled voltage and a monotonic timestamp. It owns the only copy of
//! [`BeltMonitorState`] and returns at most one [`LoopEvent`] per tick.
//! No I/O happens here; the clock is injected so every path is testable
//! with synthetic time.

pub mod edge;
pub mod event;
pub mod interval;
pub mod rip;
pub mod state;

use core::time::Duration;

use log::{debug, info};

use crate::config::MonitorConfig;
use edge::EdgeDetector;
use event::LoopEvent;
use interval::IntervalEstimator;
use rip::RipEvaluator;
use state::{BeltMonitorState, Millivolts, MonitorPhase, Timestamp};

/// Throttle for the informational Waiting / NoLoopYet events.
#[derive(Debug, Clone, Copy)]
pub struct Heartbeat {
    interval: Duration,
}

impl Heartbeat {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    pub fn is_due(&self, last_send: Timestamp, now: Timestamp) -> bool {
        now.saturating_since(last_send) >= self.interval
    }
}

/// Running counters, for diagnostics only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MonitorStats {
    /// Accepted edges after the first one.
    pub confirmed_loops: u32,
    /// Drop edges discarded by the spacing rule.
    pub rejected_edges: u32,
    /// `Rip` events emitted.
    pub rip_episodes: u32,
}

pub struct BeltMonitor {
    state: BeltMonitorState,
    edges: EdgeDetector,
    estimator: IntervalEstimator,
    rip: RipEvaluator,
    heartbeat: Heartbeat,
    stats: MonitorStats,
}

impl BeltMonitor {
    pub fn new(config: &MonitorConfig) -> Self {
        let check_interval = Duration::from_millis(u64::from(config.check_interval_ms));
        let estimator =
            IntervalEstimator::new(Duration::from_millis(u64::from(config.default_interval_ms)));
        Self {
            state: BeltMonitorState::new(estimator.initial()),
            edges: EdgeDetector::new(config.drop_threshold_mv, check_interval),
            estimator,
            rip: RipEvaluator::new(config.rip_threshold_factor),
            heartbeat: Heartbeat::new(Duration::from_millis(u64::from(config.send_interval_ms))),
            stats: MonitorStats::default(),
        }
    }

    /// Seed the differencing baseline with a reading taken before the first tick.
    pub fn prime(&mut self, voltage: Millivolts) {
        self.state.previous_voltage = voltage;
    }

    /// Process one sample.
    pub fn tick(&mut self, voltage: Millivolts, now: Timestamp) -> Option<LoopEvent> {
        self.step(Some(voltage), now)
    }

    /// Process a tick whose sample could not be taken.
    ///
    /// Counts as "no edge": the waiting / rip branches still run against the
    /// last good voltage, which is kept as the differencing baseline. A
    /// sensing path that keeps failing therefore ends in the rip alarm.
    pub fn tick_without_sample(&mut self, now: Timestamp) -> Option<LoopEvent> {
        self.step(None, now)
    }

    /// Return to the startup state. The voltage baseline is kept.
    pub fn reset(&mut self) {
        let baseline = self.state.previous_voltage;
        self.state = BeltMonitorState::new(self.estimator.initial());
        self.state.previous_voltage = baseline;
        info!("Monitor reset, waiting for first loop");
    }

    pub fn state(&self) -> &BeltMonitorState {
        &self.state
    }

    pub fn stats(&self) -> MonitorStats {
        self.stats
    }

    /// Relay level implied by the latched alarm.
    pub fn relay_asserted(&self) -> bool {
        self.state.belt_ripped
    }

    pub fn phase(&self) -> MonitorPhase {
        if self.state.belt_ripped {
            MonitorPhase::Ripped
        } else if !self.state.first_drop_detected {
            MonitorPhase::Waiting
        } else if self.stats.confirmed_loops == 0 {
            MonitorPhase::FirstLoop
        } else {
            MonitorPhase::Running
        }
    }

    // ── Internal ──────────────────────────────────────────────

    fn step(&mut self, sample: Option<Millivolts>, now: Timestamp) -> Option<LoopEvent> {
        let voltage = sample.unwrap_or(self.state.previous_voltage);
        let edge = sample.is_some_and(|v| self.edges.is_drop(self.state.previous_voltage, v));

        let event = match (edge, self.state.first_drop_detected) {
            (true, false) => Some(self.first_edge(voltage, now)),
            (true, true) => self.candidate_edge(voltage, now),
            (false, true) => self
                .rip
                .evaluate(&mut self.state, voltage, now, &self.heartbeat),
            (false, false) => self.waiting(voltage, now),
        };

        if let Some(v) = sample {
            self.state.previous_voltage = v;
        }
        if matches!(event, Some(LoopEvent::Rip { .. })) {
            self.stats.rip_episodes = self.stats.rip_episodes.saturating_add(1);
        }
        debug_assert!(self.state.is_consistent());
        event
    }

    fn first_edge(&mut self, voltage: Millivolts, now: Timestamp) -> LoopEvent {
        self.state.first_drop_detected = true;
        self.state.last_drop_time = now;
        self.state.rip_sent = false;
        self.state.last_send_time = now;
        info!("First loop: {} mV", voltage);
        LoopEvent::FirstLoop { voltage }
    }

    fn candidate_edge(&mut self, voltage: Millivolts, now: Timestamp) -> Option<LoopEvent> {
        let interval = now.saturating_since(self.state.last_drop_time);
        if !self.edges.accepts(interval) {
            self.stats.rejected_edges = self.stats.rejected_edges.saturating_add(1);
            debug!("Edge {} ms after last loop ignored", interval.as_millis());
            return None;
        }

        self.estimator
            .record(&mut self.state.previous_interval, interval);
        self.state.last_drop_time = now;
        self.state.belt_ripped = false;
        self.state.rip_sent = false;
        self.state.last_send_time = now;
        self.stats.confirmed_loops = self.stats.confirmed_loops.saturating_add(1);
        info!("Loop OK: {} ms", interval.as_millis());
        Some(LoopEvent::LoopOk { voltage, interval })
    }

    fn waiting(&mut self, voltage: Millivolts, now: Timestamp) -> Option<LoopEvent> {
        if !self.heartbeat.is_due(self.state.last_send_time, now) {
            return None;
        }
        self.state.last_send_time = now;
        Some(LoopEvent::Waiting { voltage })
    }
}
