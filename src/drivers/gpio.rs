//! `embedded-hal` output pin over a raw, already-configured GPIO number.
//!
//! Lets the relay and LED drivers be written against [`OutputPin`] so host
//! tests can substitute a recording pin.

use embedded_hal::digital::{ErrorType, OutputPin};

use crate::drivers::hw_init;
use crate::error::ActuatorError;

/// Push-pull output configured by [`hw_init::init_peripherals`].
#[derive(Debug)]
pub struct GpioOutput {
    pin: i32,
}

impl GpioOutput {
    pub const fn new(pin: i32) -> Self {
        Self { pin }
    }
}

impl ErrorType for GpioOutput {
    type Error = ActuatorError;
}

impl OutputPin for GpioOutput {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        hw_init::gpio_write(self.pin, false)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        hw_init::gpio_write(self.pin, true)
    }
}
