//! Rip evaluation: is the next edge overdue?
//!
//! Runs only on ticks without an edge, once the first edge has been seen.
//! A frozen or disconnected sensor produces no edges either, so it lands
//! on the same alarm path as a torn belt.

use core::time::Duration;

use log::error;

use super::Heartbeat;
use super::event::LoopEvent;
use super::state::{BeltMonitorState, Millivolts, Timestamp};

#[derive(Debug, Clone, Copy)]
pub struct RipEvaluator {
    factor: f32,
}

impl RipEvaluator {
    pub fn new(factor: f32) -> Self {
        Self { factor }
    }

    /// `elapsed` strictly exceeds `interval * factor`.
    pub fn is_overdue(&self, elapsed: Duration, interval: Duration) -> bool {
        elapsed.as_millis() as f64 > interval.as_millis() as f64 * f64::from(self.factor)
    }

    /// Evaluate one edge-less tick.
    ///
    /// Latches the alarm and returns `Rip` the first time the tolerance is
    /// exceeded, nothing on later ticks of the same episode, and a throttled
    /// `NoLoopYet` while still within tolerance.
    pub fn evaluate(
        &self,
        state: &mut BeltMonitorState,
        voltage: Millivolts,
        now: Timestamp,
        heartbeat: &Heartbeat,
    ) -> Option<LoopEvent> {
        let elapsed = now.saturating_since(state.last_drop_time);

        if self.is_overdue(elapsed, state.previous_interval) {
            if state.rip_sent {
                return None;
            }
            state.belt_ripped = true;
            state.rip_sent = true;
            state.last_send_time = now;
            error!("BELT RIPPED! {} ms", elapsed.as_millis());
            return Some(LoopEvent::Rip { voltage, elapsed });
        }

        if heartbeat.is_due(state.last_send_time, now) {
            state.last_send_time = now;
            return Some(LoopEvent::NoLoopYet { voltage, elapsed });
        }
        None
    }
}
