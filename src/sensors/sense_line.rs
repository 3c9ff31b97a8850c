//! Belt sense-line voltage sensor.
//!
//! Averages `oversample` raw conversions of the ADC1 sense channel,
//! converts the average to millivolts at the pin, then scales by the
//! resistive divider ratio to recover the line voltage.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: reads the channel via the oneshot API (initialised by hw_init).
//! On host/test: reads from a static `AtomicU16` for injection, and a fault
//! flag makes every conversion fail.

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicBool, AtomicU16, Ordering};

use crate::belt::state::Millivolts;
use crate::config::SystemConfig;
use crate::drivers::hw_init;
use crate::error::SensorError;

#[cfg(not(target_os = "espidf"))]
static SIM_SENSE_ADC: AtomicU16 = AtomicU16::new(0);
#[cfg(not(target_os = "espidf"))]
static SIM_ADC_FAULT: AtomicBool = AtomicBool::new(false);

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_sense_adc(raw: u16) {
    SIM_SENSE_ADC.store(raw, Ordering::Relaxed);
}

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_adc_fault(failing: bool) {
    SIM_ADC_FAULT.store(failing, Ordering::Relaxed);
}

/// Anything above this at the pin means the divider or the ADC is broken.
const PIN_MAX_PLAUSIBLE_MV: u32 = 3300;

pub struct SenseLine {
    oversample: u8,
    divider_ratio: f32,
    total_reads: u32,
}

impl SenseLine {
    pub fn new(oversample: u8, divider_ratio: f32) -> Self {
        Self {
            oversample: oversample.max(1),
            divider_ratio,
            total_reads: 0,
        }
    }

    pub fn from_config(config: &SystemConfig) -> Self {
        Self::new(config.adc_oversample, config.divider_ratio)
    }

    /// One oversampled, divider-compensated line voltage.
    pub fn read_mv(&mut self) -> Result<Millivolts, SensorError> {
        self.total_reads = self.total_reads.saturating_add(1);

        let mut sum: u32 = 0;
        for _ in 0..self.oversample {
            sum += u32::from(self.read_adc()?);
        }
        let avg = (sum / u32::from(self.oversample)) as u16;

        let pin_mv = hw_init::adc1_raw_to_mv(avg)?;
        if pin_mv > PIN_MAX_PLAUSIBLE_MV {
            return Err(SensorError::OutOfRange);
        }
        Ok((pin_mv as f32 * self.divider_ratio) as Millivolts)
    }

    pub fn total_reads(&self) -> u32 {
        self.total_reads
    }

    #[cfg(target_os = "espidf")]
    fn read_adc(&self) -> Result<u16, SensorError> {
        hw_init::adc1_read_raw()
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_adc(&self) -> Result<u16, SensorError> {
        if SIM_ADC_FAULT.load(Ordering::Relaxed) {
            return Err(SensorError::AdcReadFailed);
        }
        Ok(SIM_SENSE_ADC.load(Ordering::Relaxed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // The simulated ADC is a process-wide static; a single test covers the
    // sequence so parallel tests cannot interleave.
    #[test]
    fn simulated_line_voltage() {
        let mut line = SenseLine::new(16, 2.0);

        sim_set_adc_fault(false);
        sim_set_sense_adc(4095);
        assert_eq!(line.read_mv(), Ok(6200));

        sim_set_sense_adc(0);
        assert_eq!(line.read_mv(), Ok(0));

        sim_set_adc_fault(true);
        assert_eq!(line.read_mv(), Err(SensorError::AdcReadFailed));
        sim_set_adc_fault(false);

        assert_eq!(line.total_reads(), 3);
    }

    #[test]
    fn zero_oversample_is_clamped() {
        let line = SenseLine::new(0, 1.0);
        assert_eq!(line.oversample, 1);
    }
}
