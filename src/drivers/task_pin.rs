//! FreeRTOS priority and stack for the firmware's threads.
//!
//! ESP-IDF backs `std::thread` with pthreads over FreeRTOS tasks.
//! `esp_pthread_set_cfg()` sets the configuration used by the *next*
//! `pthread_create()` from the calling thread, so the config→spawn pair
//! must not interleave with other thread creation on that thread.
//!
//! The sampling loop stays on the main task, raised above the helpers:
//!
//! | Task       | Priority |
//! |------------|----------|
//! | sampling   | 5        |
//! | indicator  | 4        |
//! | status-tx  | 3        |
//! | console    | 2        |

use core::ffi::CStr;
use std::thread::JoinHandle;

use crate::error::{Error, Result};

pub const SAMPLING_PRIORITY: u8 = 5;
pub const INDICATOR_PRIORITY: u8 = 4;
pub const STATUS_TX_PRIORITY: u8 = 3;
pub const CONSOLE_PRIORITY: u8 = 2;

/// Spawn `f` as a task with `priority` and `stack_kb` KiB of stack.
#[cfg(target_os = "espidf")]
pub fn spawn_task(
    priority: u8,
    stack_kb: usize,
    name: &'static CStr,
    f: impl FnOnce() + Send + 'static,
) -> Result<JoinHandle<()>> {
    use esp_idf_svc::sys::{esp_create_default_pthread_config, esp_err_t, esp_pthread_set_cfg, ESP_OK};

    // SAFETY: the config struct is fully initialised by the IDF default and
    // `name` is 'static, so the pointer outlives the spawned task.
    let ret = unsafe {
        let mut cfg = esp_create_default_pthread_config();
        cfg.prio = i32::from(priority);
        cfg.stack_size = (stack_kb * 1024) as _;
        cfg.thread_name = name.as_ptr();
        esp_pthread_set_cfg(&cfg)
    };
    if ret != ESP_OK as esp_err_t {
        log::error!("esp_pthread_set_cfg failed: {}", ret);
        return Err(Error::Init("pthread config rejected"));
    }

    let display = name.to_str().unwrap_or("task");
    log::info!("Spawning '{}' (pri={}, stack={}KB)", display, priority, stack_kb);

    std::thread::Builder::new()
        .name(display.into())
        .spawn(f)
        .map_err(|_| Error::Init("thread spawn failed"))
}

/// Simulation fallback: priority is ignored.
#[cfg(not(target_os = "espidf"))]
pub fn spawn_task(
    _priority: u8,
    stack_kb: usize,
    name: &'static CStr,
    f: impl FnOnce() + Send + 'static,
) -> Result<JoinHandle<()>> {
    let display = name.to_str().unwrap_or("task");
    log::info!("Spawning '{}' (sim, stack={}KB)", display, stack_kb);

    std::thread::Builder::new()
        .name(display.into())
        .stack_size(stack_kb * 1024)
        .spawn(f)
        .map_err(|_| Error::Init("thread spawn failed"))
}

/// Set the calling task's FreeRTOS priority.
#[cfg(target_os = "espidf")]
pub fn set_current_priority(priority: u8) {
    // SAFETY: a null handle addresses the calling task.
    unsafe {
        esp_idf_svc::sys::vTaskPrioritySet(core::ptr::null_mut(), u32::from(priority));
    }
    log::info!("Current task priority set to {}", priority);
}

#[cfg(not(target_os = "espidf"))]
pub fn set_current_priority(_priority: u8) {}
