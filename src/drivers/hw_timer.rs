//! Periodic sample tick using ESP-IDF's esp_timer API.
//!
//! The timer callback raises [`SAMPLE_TICK`]; the sampling loop blocks in
//! [`wait_sample_tick`]. A `Signal` holds at most one pending value, so
//! ticks missed while the loop is busy coalesce instead of queueing up.
//! On simulation targets a sleeper thread stands in for the timer.
//!
//! Timer callbacks execute in the ESP timer task context (not ISR), so
//! signalling from them is safe.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

pub static SAMPLE_TICK: Signal<CriticalSectionRawMutex, ()> = Signal::new();

#[cfg(target_os = "espidf")]
static mut SAMPLE_TIMER: esp_timer_handle_t = core::ptr::null_mut();

#[cfg(target_os = "espidf")]
unsafe extern "C" fn sample_tick_cb(_arg: *mut core::ffi::c_void) {
    SAMPLE_TICK.signal(());
}

/// Start the periodic sample timer.
#[cfg(target_os = "espidf")]
pub fn start_sample_timer(period_ms: u32) -> crate::error::Result<()> {
    use crate::error::Error;

    // SAFETY: SAMPLE_TIMER is written here once at boot from the main task
    // before any callback fires. The callback only signals SAMPLE_TICK.
    unsafe {
        let args = esp_timer_create_args_t {
            callback: Some(sample_tick_cb),
            arg: core::ptr::null_mut(),
            dispatch_method: esp_timer_dispatch_t_ESP_TIMER_TASK,
            name: c"sample".as_ptr(),
            skip_unhandled_events: true,
        };
        let ret = esp_timer_create(&args, &raw mut SAMPLE_TIMER);
        if ret != ESP_OK as esp_err_t {
            log::error!("hw_timer: sample timer create failed (rc={})", ret);
            return Err(Error::Init("sample timer create failed"));
        }
        let ret = esp_timer_start_periodic(SAMPLE_TIMER, u64::from(period_ms) * 1_000);
        if ret != ESP_OK as esp_err_t {
            log::error!("hw_timer: sample timer start failed (rc={})", ret);
            return Err(Error::Init("sample timer start failed"));
        }
    }
    log::info!("hw_timer: sample tick every {} ms", period_ms);
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn start_sample_timer(period_ms: u32) -> crate::error::Result<()> {
    let period = std::time::Duration::from_millis(u64::from(period_ms));
    std::thread::Builder::new()
        .name("sample-tick".into())
        .spawn(move || {
            loop {
                std::thread::sleep(period);
                SAMPLE_TICK.signal(());
            }
        })
        .map_err(|_| crate::error::Error::Init("sample tick thread spawn failed"))?;
    log::info!("hw_timer(sim): sample tick every {} ms", period_ms);
    Ok(())
}

/// Block the calling thread until the next sample tick.
pub fn wait_sample_tick() {
    futures_lite::future::block_on(SAMPLE_TICK.wait());
}
