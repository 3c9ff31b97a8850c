//! Status link: the line-oriented report stream to the supervisor.
//!
//! ```text
//!   sampling loop ──try_send──▶ Channel<StatusFrame, N> ──receive──▶ writer thread ──▶ UART
//! ```
//!
//! One line per event: `S:<status>,V:<mV>,I:<interval_ms>,T:<elapsed_ms>\n`.
//! The sampling loop never blocks on the link. When the channel is full the
//! frame is dropped and counted.

use core::fmt::{self, Write as _};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use log::warn;

use crate::app::ports::EventSink;
use crate::belt::event::LoopEvent;

/// Capacity of the frame queue between the sampling loop and the writer.
pub const STATUS_QUEUE_DEPTH: usize = 16;

/// Longest line: `S:4,V:4294967295,I:4294967295,T:4294967295\n`.
pub const MAX_LINE_LEN: usize = 48;

pub type StatusChannel<const N: usize> = Channel<CriticalSectionRawMutex, StatusFrame, N>;

/// One report, already reduced to the four wire fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusFrame {
    pub status: u8,
    pub voltage_mv: u32,
    pub interval_ms: u32,
    pub elapsed_ms: u32,
}

fn saturating_ms(d: core::time::Duration) -> u32 {
    u32::try_from(d.as_millis()).unwrap_or(u32::MAX)
}

impl From<&LoopEvent> for StatusFrame {
    fn from(event: &LoopEvent) -> Self {
        Self {
            status: event.status().as_u8(),
            voltage_mv: event.voltage(),
            interval_ms: saturating_ms(event.interval()),
            elapsed_ms: saturating_ms(event.elapsed()),
        }
    }
}

impl fmt::Display for StatusFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "S:{},V:{},I:{},T:{}",
            self.status, self.voltage_mv, self.interval_ms, self.elapsed_ms
        )
    }
}

impl StatusFrame {
    /// The wire line, newline included.
    pub fn encode(&self) -> heapless::String<MAX_LINE_LEN> {
        let mut line = heapless::String::new();
        // Cannot overflow: MAX_LINE_LEN covers four u32-max fields.
        let _ = writeln!(line, "{}", self);
        line
    }
}

// ── Sink (sampling loop side) ─────────────────────────────────

/// [`EventSink`] that queues frames without ever blocking.
pub struct StatusLinkSink<'a, const N: usize> {
    channel: &'a StatusChannel<N>,
    dropped: u32,
}

impl<'a, const N: usize> StatusLinkSink<'a, N> {
    pub fn new(channel: &'a StatusChannel<N>) -> Self {
        Self {
            channel,
            dropped: 0,
        }
    }

    /// Frames discarded because the queue was full.
    pub fn dropped(&self) -> u32 {
        self.dropped
    }
}

impl<const N: usize> EventSink for StatusLinkSink<'_, N> {
    fn emit(&mut self, event: &LoopEvent) {
        let frame = StatusFrame::from(event);
        if self.channel.try_send(frame).is_err() {
            self.dropped = self.dropped.saturating_add(1);
            warn!(
                "status link full, dropped S:{} ({} dropped so far)",
                frame.status, self.dropped
            );
        }
    }
}

// ── Writer (transport side) ───────────────────────────────────

/// Drain the channel forever, handing each encoded line to `write`.
pub fn run_status_writer<const N: usize>(
    channel: &StatusChannel<N>,
    mut write: impl FnMut(&str),
) {
    loop {
        let frame = futures_lite::future::block_on(channel.receive());
        write(frame.encode().as_str());
    }
}
