//! Output drivers, hardware initialisation, task spawning, and the sample tick.

pub mod gpio;
pub mod hw_init;
pub mod hw_timer;
pub mod relay;
pub mod status_led;
pub mod task_pin;
