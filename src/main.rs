//! BeltGuard Firmware: Main Entry Point
//!
//! Hexagonal architecture with a timer-driven sampling loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter    StatusLinkSink   NvsAdapter   Esp32Clock   │
//! │  (Voltage+Relay)    LogEventSink     (Config)     (ClockPort)  │
//! │  StatusLed          console reader                             │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │            MonitorService (pure logic)                 │    │
//! │  │  edge detect · interval estimate · rip latch           │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  Tasks: sampling (main, pri 5) · indicator 4 · status-tx 3 ·   │
//! │         console 2                                              │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use std::io::Write as _;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;
use log::info;

use beltguard::adapters::console::{run_console, CommandSignal};
use beltguard::adapters::hardware::HardwareAdapter;
use beltguard::adapters::log_sink::LogEventSink;
use beltguard::adapters::nvs::NvsAdapter;
use beltguard::adapters::status_link::{
    run_status_writer, StatusChannel, StatusLinkSink, STATUS_QUEUE_DEPTH,
};
use beltguard::adapters::time::Esp32Clock;
use beltguard::app::service::MonitorService;
use beltguard::drivers::gpio::GpioOutput;
use beltguard::drivers::relay::RelayDriver;
use beltguard::drivers::status_led::StatusLed;
use beltguard::drivers::{hw_init, hw_timer, task_pin};
use beltguard::indicator::{run_indicator, MonitorFlags};
use beltguard::pins;
use beltguard::sensors::sense_line::SenseLine;

// ── Shared between threads ────────────────────────────────────

static FLAGS: MonitorFlags = MonitorFlags::new();
static STATUS: StatusChannel<STATUS_QUEUE_DEPTH> = Channel::new();
static COMMANDS: CommandSignal = Signal::new();

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("========================================");
    info!("  Belt Monitoring System v{}", env!("CARGO_PKG_VERSION"));
    info!("  Platform: {}", pins::BOARD_NAME);
    info!("========================================");

    // ── 2. Peripherals + config ───────────────────────────────
    hw_init::init_peripherals().context("peripheral init")?;

    let mut nvs = NvsAdapter::new().context("NVS init")?;
    let config = nvs.load_or_default();
    let m = &config.monitor;
    info!(
        "Config: threshold={}mV check={}ms send={}ms factor={:.2} default_interval={}ms",
        m.drop_threshold_mv,
        m.check_interval_ms,
        m.send_interval_ms,
        m.rip_threshold_factor,
        m.default_interval_ms
    );

    // ── 3. Background threads ─────────────────────────────────
    task_pin::set_current_priority(task_pin::SAMPLING_PRIORITY);

    task_pin::spawn_task(task_pin::INDICATOR_PRIORITY, 3, c"indicator", || {
        let mut led = StatusLed::new(GpioOutput::new(pins::LED_GPIO));
        run_indicator(&FLAGS, &mut led);
    })
    .context("spawn indicator thread")?;

    task_pin::spawn_task(task_pin::STATUS_TX_PRIORITY, 4, c"status-tx", || {
        run_status_writer(&STATUS, |line| {
            let mut out = std::io::stdout().lock();
            // A lost line is reported again by the next heartbeat.
            let _ = out.write_all(line.as_bytes());
            let _ = out.flush();
        });
    })
    .context("spawn status writer thread")?;

    task_pin::spawn_task(task_pin::CONSOLE_PRIORITY, 6, c"console", || {
        run_console(std::io::stdin().lock(), &COMMANDS);
    })
    .context("spawn console thread")?;

    // ── 4. Settle, then take the baseline ─────────────────────
    thread::sleep(Duration::from_millis(u64::from(config.startup_delay_ms)));
    info!("Belt monitoring started");

    let mut hw = HardwareAdapter::new(
        SenseLine::from_config(&config),
        RelayDriver::new(GpioOutput::new(pins::RELAY_GPIO)),
    );
    let clock = Esp32Clock::new();
    let mut sink = (StatusLinkSink::new(&STATUS), LogEventSink::new());
    let mut service = MonitorService::new(&config.monitor, &FLAGS);
    service.start(&mut hw);

    hw_timer::start_sample_timer(config.monitor.check_interval_ms)
        .context("sample timer")?;
    info!("System running");

    // ── 5. Sampling loop ──────────────────────────────────────
    loop {
        hw_timer::wait_sample_tick();
        if let Some(cmd) = COMMANDS.try_take() {
            service.handle_command(cmd, &mut hw, &mut nvs);
        }
        service.tick(&mut hw, &clock, &mut sink);
    }
}
