//! Rip relay driver.
//!
//! Active-high coil drive. The driver remembers the level last written so
//! repeated commands cost nothing, and forgets it when a write fails so the
//! next command (the service re-issues one every tick) retries the write.

use embedded_hal::digital::OutputPin;
use log::{error, info};

pub struct RelayDriver<P: OutputPin> {
    pin: P,
    asserted: Option<bool>,
}

impl<P: OutputPin> RelayDriver<P> {
    /// Wrap `pin` and drive it low (relay released).
    pub fn new(pin: P) -> Self {
        let mut relay = Self {
            pin,
            asserted: None,
        };
        relay.set(false);
        relay
    }

    /// Energise (`true`) or release (`false`) the relay.
    pub fn set(&mut self, asserted: bool) {
        if self.asserted == Some(asserted) {
            return;
        }
        let result = if asserted {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        match result {
            Ok(()) => {
                self.asserted = Some(asserted);
                info!("Relay {}", if asserted { "ENERGISED" } else { "released" });
            }
            Err(e) => {
                self.asserted = None;
                error!("Relay write failed: {:?}", e);
            }
        }
    }

    /// Last level confirmed written, `None` if the last write failed.
    pub fn is_asserted(&self) -> Option<bool> {
        self.asserted
    }
}
