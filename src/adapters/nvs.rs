//! NVS (Non-Volatile Storage) adapter.
//!
//! Implements [`ConfigPort`] for the BeltGuard monitor. The
//! [`SystemConfig`] is stored as a single postcard blob under namespace
//! `beltguard`, key `syscfg`.
//!
//! - Config validation: every field is range-checked before persistence.
//! - Atomic writes: ESP-IDF NVS commits are atomic per `nvs_commit()`.
//! - The simulation backend keeps blobs in memory (dev/test only).

use log::info;
#[cfg(target_os = "espidf")]
use log::warn;

use crate::app::ports::{ConfigError, ConfigPort};
use crate::config::SystemConfig;

#[cfg(not(target_os = "espidf"))]
use std::collections::HashMap;

#[cfg(target_os = "espidf")]
use core::ffi::CStr;
#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
const CONFIG_NAMESPACE: &CStr = c"beltguard";
#[cfg(target_os = "espidf")]
const CONFIG_KEY: &CStr = c"syscfg";

#[cfg(not(target_os = "espidf"))]
const CONFIG_KEY: &str = "beltguard::syscfg";

#[cfg(target_os = "espidf")]
const MAX_BLOB_SIZE: usize = 256;

pub struct NvsAdapter {
    #[cfg(not(target_os = "espidf"))]
    store: HashMap<String, Vec<u8>>,
}

impl NvsAdapter {
    /// Create the adapter and initialise NVS flash.
    ///
    /// On first boot or after a version mismatch the NVS partition is
    /// erased and re-initialised automatically.
    pub fn new() -> Result<Self, ConfigError> {
        #[cfg(target_os = "espidf")]
        {
            // SAFETY: nvs_flash_init / nvs_flash_erase are called from the
            // main task before any other NVS access.
            let ret = unsafe { nvs_flash_init() };
            if ret == ESP_ERR_NVS_NO_FREE_PAGES as esp_err_t
                || ret == ESP_ERR_NVS_NEW_VERSION_FOUND as esp_err_t
            {
                warn!("NVS: erasing and re-initialising flash partition");
                if unsafe { nvs_flash_erase() } != ESP_OK as esp_err_t {
                    return Err(ConfigError::IoError);
                }
                if unsafe { nvs_flash_init() } != ESP_OK as esp_err_t {
                    return Err(ConfigError::IoError);
                }
            } else if ret != ESP_OK as esp_err_t {
                return Err(ConfigError::IoError);
            }
            info!("NvsAdapter: ESP-IDF NVS initialised");
        }

        #[cfg(not(target_os = "espidf"))]
        info!("NvsAdapter: simulation backend");

        Ok(Self {
            #[cfg(not(target_os = "espidf"))]
            store: HashMap::new(),
        })
    }

    /// Load, falling back to defaults on any error.
    pub fn load_or_default(&self) -> SystemConfig {
        match self.load() {
            Ok(cfg) => cfg,
            Err(e) => {
                log::warn!("NvsAdapter: {}, using defaults", e);
                SystemConfig::default()
            }
        }
    }

    /// Open the config namespace, run `f` with the handle, then close.
    #[cfg(target_os = "espidf")]
    fn with_nvs_handle<F, T>(write: bool, f: F) -> Result<T, esp_err_t>
    where
        F: FnOnce(nvs_handle_t) -> Result<T, esp_err_t>,
    {
        let mut handle: nvs_handle_t = 0;
        let mode = if write {
            nvs_open_mode_t_NVS_READWRITE
        } else {
            nvs_open_mode_t_NVS_READONLY
        };

        // SAFETY: CONFIG_NAMESPACE is NUL-terminated; handle is closed below.
        let ret = unsafe { nvs_open(CONFIG_NAMESPACE.as_ptr(), mode, &mut handle) };
        if ret != ESP_OK as esp_err_t {
            return Err(ret);
        }

        let result = f(handle);
        unsafe {
            nvs_close(handle);
        }
        result
    }

    #[cfg(target_os = "espidf")]
    fn read_blob() -> Result<Vec<u8>, esp_err_t> {
        Self::with_nvs_handle(false, |handle| {
            let mut size: usize = 0;
            // First call: get size
            let ret = unsafe {
                nvs_get_blob(handle, CONFIG_KEY.as_ptr(), core::ptr::null_mut(), &mut size)
            };
            if ret != ESP_OK as esp_err_t {
                return Err(ret);
            }
            if size == 0 || size > MAX_BLOB_SIZE {
                return Err(ESP_ERR_NVS_INVALID_LENGTH as esp_err_t);
            }

            let mut buf = vec![0u8; size];
            let ret = unsafe {
                nvs_get_blob(
                    handle,
                    CONFIG_KEY.as_ptr(),
                    buf.as_mut_ptr().cast(),
                    &mut size,
                )
            };
            if ret != ESP_OK as esp_err_t {
                return Err(ret);
            }
            buf.truncate(size);
            Ok(buf)
        })
    }

    #[cfg(target_os = "espidf")]
    fn write_blob(bytes: &[u8]) -> Result<(), esp_err_t> {
        Self::with_nvs_handle(true, |handle| {
            let ret = unsafe {
                nvs_set_blob(
                    handle,
                    CONFIG_KEY.as_ptr(),
                    bytes.as_ptr().cast(),
                    bytes.len(),
                )
            };
            if ret != ESP_OK as esp_err_t {
                return Err(ret);
            }
            let ret = unsafe { nvs_commit(handle) };
            if ret != ESP_OK as esp_err_t {
                return Err(ret);
            }
            Ok(())
        })
    }
}

impl ConfigPort for NvsAdapter {
    fn load(&self) -> Result<SystemConfig, ConfigError> {
        #[cfg(not(target_os = "espidf"))]
        let stored: Option<Vec<u8>> = self.store.get(CONFIG_KEY).cloned();

        #[cfg(target_os = "espidf")]
        let stored: Option<Vec<u8>> = match Self::read_blob() {
            Ok(bytes) => Some(bytes),
            Err(e) if e == ESP_ERR_NVS_NOT_FOUND as esp_err_t => None,
            Err(e) => {
                warn!("NvsAdapter: NVS read error {}", e);
                return Err(ConfigError::IoError);
            }
        };

        let Some(bytes) = stored else {
            info!("NvsAdapter: no stored config, using defaults");
            return Ok(SystemConfig::default());
        };

        let cfg: SystemConfig =
            postcard::from_bytes(&bytes).map_err(|_| ConfigError::Corrupted)?;
        // A blob written by an older build may carry values this build rejects.
        cfg.validate()?;
        info!("NvsAdapter: loaded config ({} bytes)", bytes.len());
        Ok(cfg)
    }

    fn save(&mut self, config: &SystemConfig) -> Result<(), ConfigError> {
        config.validate()?;
        let bytes = postcard::to_allocvec(config).map_err(|_| ConfigError::IoError)?;

        #[cfg(not(target_os = "espidf"))]
        {
            self.store.insert(CONFIG_KEY.to_owned(), bytes);
            info!("NvsAdapter: config saved (simulation)");
            Ok(())
        }

        #[cfg(target_os = "espidf")]
        {
            match Self::write_blob(&bytes) {
                Ok(()) => {
                    info!("NvsAdapter: config saved to NVS ({} bytes)", bytes.len());
                    Ok(())
                }
                Err(e) => {
                    warn!("NvsAdapter: NVS write error {}", e);
                    Err(ConfigError::IoError)
                }
            }
        }
    }
}

#[cfg(all(test, not(target_os = "espidf")))]
impl NvsAdapter {
    fn corrupt(&mut self) {
        self.store.insert(CONFIG_KEY.to_owned(), vec![0xFF; 3]);
    }
}
