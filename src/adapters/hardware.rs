//! Hardware adapter: bridges real peripherals to domain port traits.
//!
//! Owns the [`SenseLine`] and the [`RelayDriver`], exposing them through
//! [`VoltagePort`] and [`RelayPort`]. The status LED lives on the indicator
//! thread, so [`StatusLed`] implements [`IndicatorPort`] on its own.
//! On non-espidf targets the underlying drivers use cfg-gated simulation
//! stubs.

use embedded_hal::digital::OutputPin;

use crate::app::ports::{IndicatorPort, RelayPort, VoltagePort};
use crate::belt::state::Millivolts;
use crate::drivers::gpio::GpioOutput;
use crate::drivers::relay::RelayDriver;
use crate::drivers::status_led::StatusLed;
use crate::error::SensorError;
use crate::sensors::sense_line::SenseLine;

/// Concrete adapter for the sampling loop's hardware.
pub struct HardwareAdapter {
    sense: SenseLine,
    relay: RelayDriver<GpioOutput>,
}

impl HardwareAdapter {
    pub fn new(sense: SenseLine, relay: RelayDriver<GpioOutput>) -> Self {
        Self { sense, relay }
    }
}

// ── VoltagePort implementation ────────────────────────────────

impl VoltagePort for HardwareAdapter {
    fn sample(&mut self) -> Result<Millivolts, SensorError> {
        self.sense.read_mv()
    }
}

// ── RelayPort implementation ──────────────────────────────────

impl RelayPort for HardwareAdapter {
    fn set_relay(&mut self, asserted: bool) {
        self.relay.set(asserted);
    }
}

// ── IndicatorPort implementation ──────────────────────────────

impl<P: OutputPin> IndicatorPort for StatusLed<P> {
    fn set_indicator(&mut self, lit: bool) {
        self.set(lit);
    }
}
