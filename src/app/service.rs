//! Application service: the hexagonal core.
//!
//! [`MonitorService`] owns the [`BeltMonitor`] and runs one sampling cycle
//! per tick. All I/O flows through port traits injected at call sites,
//! making the entire service testable with mock adapters.
//!
//! ```text
//!  VoltagePort ──▶ ┌────────────────────────┐ ──▶ EventSink
//!                  │     MonitorService     │
//!   RelayPort  ◀── │  edge · interval · rip │ ──▶ MonitorFlags ──▶ indicator
//!                  └────────────────────────┘
//! ```

use log::{info, warn};

use crate::belt::event::LoopEvent;
use crate::belt::state::{Millivolts, MonitorPhase};
use crate::belt::{BeltMonitor, MonitorStats};
use crate::config::MonitorConfig;
use crate::indicator::MonitorFlags;

use super::commands::SupervisorCommand;
use super::ports::{ClockPort, ConfigPort, EventSink, RelayPort, VoltagePort};

/// Orchestrates sample → monitor → relay → flags → sink.
pub struct MonitorService<'f> {
    monitor: BeltMonitor,
    flags: &'f MonitorFlags,
    /// Consecutive failed samples.
    sample_failures: u32,
}

impl<'f> MonitorService<'f> {
    /// Construct the service. Call [`start`](Self::start) before the first tick.
    pub fn new(config: &MonitorConfig, flags: &'f MonitorFlags) -> Self {
        Self {
            monitor: BeltMonitor::new(config),
            flags,
            sample_failures: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Take the baseline reading, release the relay and publish the
    /// initial flags. Returns the baseline if the sample succeeded.
    pub fn start(&mut self, hw: &mut (impl VoltagePort + RelayPort)) -> Option<Millivolts> {
        hw.set_relay(false);
        self.flags.publish(self.monitor.state());
        match hw.sample() {
            Ok(voltage) => {
                self.monitor.prime(voltage);
                info!(
                    "Initial voltage: {} mV ({}.{:02} V)",
                    voltage,
                    voltage / 1000,
                    (voltage % 1000) / 10
                );
                Some(voltage)
            }
            Err(e) => {
                warn!("Initial sample failed ({}), baseline 0 mV", e);
                None
            }
        }
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one sampling cycle.
    ///
    /// The `hw` parameter satisfies **both** [`VoltagePort`] and
    /// [`RelayPort`], so one `&mut` reaches both.
    pub fn tick(
        &mut self,
        hw: &mut (impl VoltagePort + RelayPort),
        clock: &impl ClockPort,
        sink: &mut impl EventSink,
    ) -> Option<LoopEvent> {
        let now = clock.now();

        let event = match hw.sample() {
            Ok(voltage) => {
                if self.sample_failures > 0 {
                    info!("Sampling recovered after {} failed ticks", self.sample_failures);
                    self.sample_failures = 0;
                }
                self.monitor.tick(voltage, now)
            }
            Err(e) => {
                if self.sample_failures == 0 {
                    warn!("Sample failed ({}), treating tick as edge-less", e);
                }
                self.sample_failures = self.sample_failures.saturating_add(1);
                self.monitor.tick_without_sample(now)
            }
        };

        // Re-driven every tick so a failed write is retried while latched.
        hw.set_relay(self.monitor.relay_asserted());

        self.flags.publish(self.monitor.state());

        if let Some(ev) = &event {
            sink.emit(ev);
        }
        event
    }

    // ── Command handling ──────────────────────────────────────

    /// Apply a supervisor command between ticks.
    pub fn handle_command(
        &mut self,
        cmd: SupervisorCommand,
        hw: &mut impl RelayPort,
        store: &mut impl ConfigPort,
    ) {
        match cmd {
            SupervisorCommand::Reset => {
                self.monitor.reset();
                hw.set_relay(false);
                self.flags.publish(self.monitor.state());
            }
            SupervisorCommand::StageConfig(config) => match store.save(&config) {
                Ok(()) => info!("Config staged, takes effect after restart"),
                Err(e) => warn!("Config rejected: {}", e),
            },
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn phase(&self) -> MonitorPhase {
        self.monitor.phase()
    }

    pub fn relay_asserted(&self) -> bool {
        self.monitor.relay_asserted()
    }

    pub fn stats(&self) -> MonitorStats {
        self.monitor.stats()
    }

    pub fn sample_failures(&self) -> u32 {
        self.sample_failures
    }
}
