//! Single-colour status LED driver.
//!
//! GPIO level 1 = lit. Patterns are sequenced by
//! [`IndicatorController`](crate::indicator::IndicatorController); this
//! driver only sets the level.

use embedded_hal::digital::OutputPin;

pub struct StatusLed<P: OutputPin> {
    pin: P,
    lit: bool,
}

impl<P: OutputPin> StatusLed<P> {
    pub fn new(pin: P) -> Self {
        Self { pin, lit: false }
    }

    pub fn set(&mut self, lit: bool) {
        let result = if lit {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        // A missed blink is harmless; the next step rewrites the level.
        if let Err(e) = result {
            log::debug!("LED write failed: {:?}", e);
            return;
        }
        self.lit = lit;
    }

    pub fn is_lit(&self) -> bool {
        self.lit
    }
}
