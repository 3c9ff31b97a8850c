//! Mock adapters for integration tests.
//!
//! Records every relay level change so tests can assert on the output
//! history, and replays a scripted voltage sequence without touching the
//! ADC. [`FlakyRelayHardware`] puts the real [`RelayDriver`] behind a pin
//! that can be told to fail.

use std::cell::Cell;
use std::collections::VecDeque;

use beltguard::app::ports::{
    ClockPort, ConfigError, ConfigPort, EventSink, RelayPort, VoltagePort,
};
use beltguard::belt::event::LoopEvent;
use beltguard::belt::state::{Millivolts, Timestamp};
use beltguard::config::SystemConfig;
use beltguard::drivers::relay::RelayDriver;
use beltguard::error::{ActuatorError, SensorError};
use embedded_hal::digital::{ErrorType, OutputPin};

// ── MockHardware ──────────────────────────────────────────────

/// Scripted voltage source plus a relay that records level changes.
///
/// Once the script runs out, the resting voltage repeats (belt stopped,
/// line steady).
pub struct MockHardware {
    script: VecDeque<Result<Millivolts, SensorError>>,
    resting: Millivolts,
    pub relay_calls: Vec<bool>,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new(resting: Millivolts) -> Self {
        Self {
            script: VecDeque::new(),
            resting,
            relay_calls: Vec::new(),
        }
    }

    pub fn push(&mut self, voltage: Millivolts) -> &mut Self {
        self.script.push_back(Ok(voltage));
        self
    }

    pub fn push_failure(&mut self) -> &mut Self {
        self.script.push_back(Err(SensorError::AdcReadFailed));
        self
    }

    /// Queue `n` samples at the resting level.
    pub fn idle(&mut self, n: usize) -> &mut Self {
        for _ in 0..n {
            self.script.push_back(Ok(self.resting));
        }
        self
    }

    /// A loop joint passing the sensor: one sample dipped by `depth` mV.
    pub fn pass(&mut self, depth: Millivolts) -> &mut Self {
        self.push(self.resting - depth)
    }

    /// Current relay level (released if never set).
    pub fn relay(&self) -> bool {
        self.relay_calls.last().copied().unwrap_or(false)
    }
}

impl VoltagePort for MockHardware {
    fn sample(&mut self) -> Result<Millivolts, SensorError> {
        match self.script.pop_front() {
            Some(sample) => sample,
            None => Ok(self.resting),
        }
    }
}

impl RelayPort for MockHardware {
    fn set_relay(&mut self, asserted: bool) {
        if self.relay_calls.last() != Some(&asserted) {
            self.relay_calls.push(asserted);
        }
    }
}

// ── FlakyRelayHardware ────────────────────────────────────────

/// Relay coil pin that rejects the next `fail_high` energise writes.
#[derive(Default)]
pub struct FlakyPin {
    pub fail_high: u32,
}

impl ErrorType for FlakyPin {
    type Error = ActuatorError;
}

impl OutputPin for FlakyPin {
    fn set_low(&mut self) -> Result<(), ActuatorError> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), ActuatorError> {
        if self.fail_high > 0 {
            self.fail_high -= 1;
            return Err(ActuatorError::GpioWriteFailed);
        }
        Ok(())
    }
}

/// Scripted voltages from a [`MockHardware`], relay through the real driver.
pub struct FlakyRelayHardware {
    pub sense: MockHardware,
    pub relay: RelayDriver<FlakyPin>,
}

impl FlakyRelayHardware {
    pub fn new(sense: MockHardware, pin: FlakyPin) -> Self {
        Self {
            sense,
            relay: RelayDriver::new(pin),
        }
    }
}

impl VoltagePort for FlakyRelayHardware {
    fn sample(&mut self) -> Result<Millivolts, SensorError> {
        self.sense.sample()
    }
}

impl RelayPort for FlakyRelayHardware {
    fn set_relay(&mut self, asserted: bool) {
        self.relay.set(asserted);
    }
}

// ── ManualClock ───────────────────────────────────────────────

/// Clock the test advances explicitly.
#[derive(Default)]
pub struct ManualClock {
    now_ms: Cell<u64>,
}

#[allow(dead_code)]
impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, ms: u64) {
        self.now_ms.set(ms);
    }

    pub fn advance(&self, ms: u64) {
        self.now_ms.set(self.now_ms.get() + ms);
    }

    pub fn ms(&self) -> u64 {
        self.now_ms.get()
    }
}

impl ClockPort for ManualClock {
    fn now(&self) -> Timestamp {
        Timestamp::from_millis(self.now_ms.get())
    }
}

// ── RecordingSink ─────────────────────────────────────────────

/// Captures every emitted event in order.
#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<LoopEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status_codes(&self) -> Vec<u8> {
        self.events.iter().map(|e| e.status().as_u8()).collect()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &LoopEvent) {
        self.events.push(*event);
    }
}

// ── MockConfigStore ───────────────────────────────────────────

#[derive(Default)]
pub struct MockConfigStore {
    pub saved: Option<SystemConfig>,
}

impl ConfigPort for MockConfigStore {
    fn load(&self) -> Result<SystemConfig, ConfigError> {
        Ok(self.saved.unwrap_or_default())
    }

    fn save(&mut self, config: &SystemConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.saved = Some(*config);
        Ok(())
    }
}
