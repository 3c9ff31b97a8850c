//! GPIO / peripheral pin assignments for the BeltGuard monitor boards.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers. Two board variants are supported and selected at
//! build time by the ESP-IDF target (`cfg(esp32s3)`).

// ---------------------------------------------------------------------------
// Sense line (ADC1)
// ---------------------------------------------------------------------------

/// Belt sense line through a resistive divider.
/// ADC1 channel 3 (GPIO 4 on ESP32-S3).
#[cfg(esp32s3)]
pub const SENSE_ADC_CHANNEL: u32 = 3;
#[cfg(esp32s3)]
pub const SENSE_ADC_GPIO: i32 = 4;

/// ADC1 channel 0 (GPIO 36 / VP on ESP32).
#[cfg(not(esp32s3))]
pub const SENSE_ADC_CHANNEL: u32 = 0;
#[cfg(not(esp32s3))]
pub const SENSE_ADC_GPIO: i32 = 36;

// ---------------------------------------------------------------------------
// Outputs
// ---------------------------------------------------------------------------

/// Rip relay coil driver. HIGH = energised (alarm / conveyor cutoff).
pub const RELAY_GPIO: i32 = 5;

/// Status LED, HIGH = lit.
#[cfg(esp32s3)]
pub const LED_GPIO: i32 = 27;
#[cfg(not(esp32s3))]
pub const LED_GPIO: i32 = 2;

// ---------------------------------------------------------------------------
// Board identity
// ---------------------------------------------------------------------------

#[cfg(esp32s3)]
pub const BOARD_NAME: &str = "ESP32-S3";
#[cfg(not(esp32s3))]
pub const BOARD_NAME: &str = "ESP32";
