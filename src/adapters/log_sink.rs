//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing every [`LoopEvent`] to the ESP-IDF
//! logger (UART / USB-CDC in production). Paired with the status link so
//! an operator watching the console sees the same reports in readable form.

use log::{info, warn};

use crate::app::ports::EventSink;
use crate::belt::event::LoopEvent;

/// Adapter that logs every [`LoopEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &LoopEvent) {
        match event {
            LoopEvent::Waiting { voltage } => {
                info!("STATUS | waiting for first loop | V={}mV", voltage);
            }
            LoopEvent::FirstLoop { voltage } => {
                info!("STATUS | first loop | V={}mV", voltage);
            }
            LoopEvent::LoopOk { voltage, interval } => {
                info!(
                    "STATUS | loop ok | V={}mV | interval={}ms",
                    voltage,
                    interval.as_millis()
                );
            }
            LoopEvent::Rip { voltage, elapsed } => {
                warn!(
                    "STATUS | RIP | V={}mV | since_last={}ms",
                    voltage,
                    elapsed.as_millis()
                );
            }
            LoopEvent::NoLoopYet { voltage, elapsed } => {
                info!(
                    "STATUS | no loop yet | V={}mV | since_last={}ms",
                    voltage,
                    elapsed.as_millis()
                );
            }
        }
    }
}
