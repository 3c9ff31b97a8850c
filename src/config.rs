//! System configuration parameters
//!
//! All tunable parameters for the BeltGuard monitor.
//! Values are fixed once the monitor is constructed; a config pushed at
//! runtime is persisted to NVS and picked up on the next boot.

use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;

/// Detection parameters consumed by the belt monitor core.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Voltage drop between consecutive samples that counts as an edge (mV)
    pub drop_threshold_mv: u32,
    /// Sampling period, also the debounce window between edges (milliseconds)
    pub check_interval_ms: u32,
    /// Minimum spacing of Waiting / NoLoopYet heartbeats (milliseconds)
    pub send_interval_ms: u32,
    /// Multiplier on the last loop interval before a rip is declared
    pub rip_threshold_factor: f32,
    /// Expected loop interval before the first one is measured (milliseconds)
    pub default_interval_ms: u32,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            drop_threshold_mv: 100,
            check_interval_ms: 1000, // 1 Hz
            send_interval_ms: 5000,
            rip_threshold_factor: 1.5,
            default_interval_ms: 10_000,
        }
    }
}

/// Core system configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Detection ---
    pub monitor: MonitorConfig,

    // --- Sampling ---
    /// Settle time after boot before the monitor loop starts (milliseconds)
    pub startup_delay_ms: u32,
    /// Raw ADC reads averaged into one voltage sample
    pub adc_oversample: u8,
    /// Sense-line voltage divider ratio (sense line mV = ADC mV * ratio)
    pub divider_ratio: f32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            monitor: MonitorConfig::default(),
            startup_delay_ms: 3000,
            adc_oversample: 16,
            // 5 V line through a 10k/10k divider
            divider_ratio: 2.0,
        }
    }
}

impl SystemConfig {
    /// Range-check every field. Invalid values are rejected, never clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let m = &self.monitor;
        if m.drop_threshold_mv == 0 {
            return Err(ConfigError::ValidationFailed(
                "drop_threshold_mv must be > 0",
            ));
        }
        if m.check_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed(
                "check_interval_ms must be > 0",
            ));
        }
        if m.send_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed(
                "send_interval_ms must be > 0",
            ));
        }
        if !m.rip_threshold_factor.is_finite() || m.rip_threshold_factor <= 1.0 {
            return Err(ConfigError::ValidationFailed(
                "rip_threshold_factor must be finite and > 1.0",
            ));
        }
        if m.default_interval_ms <= m.check_interval_ms {
            return Err(ConfigError::ValidationFailed(
                "default_interval_ms must be > check_interval_ms",
            ));
        }
        if self.adc_oversample == 0 {
            return Err(ConfigError::ValidationFailed("adc_oversample must be > 0"));
        }
        if !self.divider_ratio.is_finite() || self.divider_ratio < 1.0 {
            return Err(ConfigError::ValidationFailed(
                "divider_ratio must be finite and >= 1.0",
            ));
        }
        Ok(())
    }
}
