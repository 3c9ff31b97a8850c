//! One-shot hardware peripheral initialization.
//!
//! Configures the sense-line ADC channel (with calibration) and the relay /
//! LED GPIO outputs using raw ESP-IDF sys calls. Called once from `main()`
//! before the monitor loop starts.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::{info, warn};

use crate::error::{ActuatorError, SensorError};
#[cfg(target_os = "espidf")]
use crate::error::Error;
#[cfg(target_os = "espidf")]
use crate::pins;

/// Full-scale millivolts at 12 dB attenuation, used when no calibration
/// scheme could be created.
const UNCALIBRATED_FULL_SCALE_MV: u32 = 3100;
const ADC_MAX_RAW: u32 = 4095;

#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> crate::error::Result<()> {
    // SAFETY: Called once from main() before any task is spawned.
    unsafe {
        init_adc()?;
        init_gpio_outputs()?;
    }
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> crate::error::Result<()> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

// ── ADC (oneshot) ─────────────────────────────────────────────

#[cfg(target_os = "espidf")]
static mut ADC1_HANDLE: adc_oneshot_unit_handle_t = core::ptr::null_mut();
#[cfg(target_os = "espidf")]
static mut ADC1_CALI: adc_cali_handle_t = core::ptr::null_mut();

/// SAFETY: Both handles are written once in `init_adc()` before the
/// sampling loop starts, and read only from the sampling loop afterwards.
#[cfg(target_os = "espidf")]
unsafe fn adc1_handle() -> adc_oneshot_unit_handle_t {
    unsafe { ADC1_HANDLE }
}

#[cfg(target_os = "espidf")]
unsafe fn adc1_cali() -> adc_cali_handle_t {
    unsafe { ADC1_CALI }
}

#[cfg(target_os = "espidf")]
unsafe fn init_adc() -> crate::error::Result<()> {
    let init_cfg = adc_oneshot_unit_init_cfg_t {
        unit_id: adc_unit_t_ADC_UNIT_1,
        ulp_mode: adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
        ..Default::default()
    };
    // SAFETY: ADC1_HANDLE is only written here, once at boot.
    let ret = unsafe { adc_oneshot_new_unit(&init_cfg, &raw mut ADC1_HANDLE) };
    if ret != ESP_OK as esp_err_t {
        log::error!("hw_init: adc_oneshot_new_unit rc={}", ret);
        return Err(Error::Init("ADC1 unit init failed"));
    }

    let chan_cfg = adc_oneshot_chan_cfg_t {
        atten: adc_atten_t_ADC_ATTEN_DB_12,
        bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
    };
    let ret =
        unsafe { adc_oneshot_config_channel(adc1_handle(), pins::SENSE_ADC_CHANNEL, &chan_cfg) };
    if ret != ESP_OK as esp_err_t {
        log::error!("hw_init: adc_oneshot_config_channel rc={}", ret);
        return Err(Error::Init("ADC1 channel config failed"));
    }

    // Calibration is best-effort: without it we fall back to a linear
    // full-scale conversion.
    let ret = unsafe { create_cali_scheme() };
    if ret == ESP_OK as esp_err_t {
        info!("hw_init: ADC1 calibration scheme active");
    } else {
        warn!(
            "hw_init: ADC1 calibration unavailable (rc={}), using linear conversion",
            ret
        );
    }

    info!(
        "hw_init: ADC configured on GPIO{} (ADC1_CH{})",
        pins::SENSE_ADC_GPIO,
        pins::SENSE_ADC_CHANNEL
    );
    Ok(())
}

#[cfg(all(target_os = "espidf", esp32s3))]
unsafe fn create_cali_scheme() -> esp_err_t {
    let cfg = adc_cali_curve_fitting_config_t {
        unit_id: adc_unit_t_ADC_UNIT_1,
        chan: pins::SENSE_ADC_CHANNEL,
        atten: adc_atten_t_ADC_ATTEN_DB_12,
        bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
    };
    // SAFETY: ADC1_CALI is only written here, once at boot.
    unsafe { adc_cali_create_scheme_curve_fitting(&cfg, &raw mut ADC1_CALI) }
}

#[cfg(all(target_os = "espidf", not(esp32s3)))]
unsafe fn create_cali_scheme() -> esp_err_t {
    let cfg = adc_cali_line_fitting_config_t {
        unit_id: adc_unit_t_ADC_UNIT_1,
        atten: adc_atten_t_ADC_ATTEN_DB_12,
        bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
        ..Default::default()
    };
    // SAFETY: ADC1_CALI is only written here, once at boot.
    unsafe { adc_cali_create_scheme_line_fitting(&cfg, &raw mut ADC1_CALI) }
}

/// One raw conversion of the sense-line channel.
#[cfg(target_os = "espidf")]
pub fn adc1_read_raw() -> Result<u16, SensorError> {
    let mut raw: i32 = 0;
    // SAFETY: adc1_handle() contract: sampling loop access only.
    let ret = unsafe { adc_oneshot_read(adc1_handle(), pins::SENSE_ADC_CHANNEL, &mut raw) };
    if ret != ESP_OK as esp_err_t {
        return Err(SensorError::AdcReadFailed);
    }
    Ok(raw.max(0) as u16)
}

/// Convert an (averaged) raw reading to millivolts at the ADC pin.
#[cfg(target_os = "espidf")]
pub fn adc1_raw_to_mv(raw: u16) -> Result<u32, SensorError> {
    // SAFETY: adc1_cali() contract: sampling loop access only.
    let cali = unsafe { adc1_cali() };
    if cali.is_null() {
        return Ok(linear_raw_to_mv(raw));
    }
    let mut mv: i32 = 0;
    let ret = unsafe { adc_cali_raw_to_voltage(cali, i32::from(raw), &mut mv) };
    if ret != ESP_OK as esp_err_t {
        return Err(SensorError::CalibrationFailed);
    }
    Ok(mv.max(0) as u32)
}

#[cfg(not(target_os = "espidf"))]
pub fn adc1_raw_to_mv(raw: u16) -> Result<u32, SensorError> {
    Ok(linear_raw_to_mv(raw))
}

/// Uncalibrated conversion, `raw` clamped to the 12-bit range.
pub fn linear_raw_to_mv(raw: u16) -> u32 {
    u32::from(raw).min(ADC_MAX_RAW) * UNCALIBRATED_FULL_SCALE_MV / ADC_MAX_RAW
}

// ── GPIO Outputs ──────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_outputs() -> crate::error::Result<()> {
    let cfg = gpio_config_t {
        pin_bit_mask: (1u64 << pins::RELAY_GPIO) | (1u64 << pins::LED_GPIO),
        mode: gpio_mode_t_GPIO_MODE_OUTPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
    };
    let ret = unsafe { gpio_config(&cfg) };
    if ret != ESP_OK as esp_err_t {
        log::error!("hw_init: gpio_config rc={}", ret);
        return Err(Error::Init("GPIO output config failed"));
    }
    // Relay released, LED lit until the indicator loop takes over.
    unsafe {
        gpio_set_level(pins::RELAY_GPIO, 0);
        gpio_set_level(pins::LED_GPIO, 1);
    }

    info!(
        "hw_init: GPIO - LED: {}, Relay: {}",
        pins::LED_GPIO,
        pins::RELAY_GPIO
    );
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_write(pin: i32, high: bool) -> Result<(), ActuatorError> {
    // SAFETY: gpio_set_level writes to an output pin configured in
    // init_gpio_outputs(); each pin has a single owning driver.
    let ret = unsafe { gpio_set_level(pin, u32::from(high)) };
    if ret != ESP_OK as esp_err_t {
        return Err(ActuatorError::GpioWriteFailed);
    }
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_write(_pin: i32, _high: bool) -> Result<(), ActuatorError> {
    Ok(())
}
