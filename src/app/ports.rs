//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ MonitorService (domain)
//! ```
//!
//! Driven adapters (ADC, relay, LED, status transport, storage, clock)
//! implement these traits. The [`MonitorService`](super::service::MonitorService)
//! consumes them via generics, so the domain core never touches hardware
//! directly.

use crate::belt::event::LoopEvent;
use crate::belt::state::{Millivolts, Timestamp};
use crate::config::SystemConfig;
use crate::error::SensorError;

// ───────────────────────────────────────────────────────────────
// Sense line (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Calibrated voltage source. Must return within bounded time.
pub trait VoltagePort {
    fn sample(&mut self) -> Result<Millivolts, SensorError>;
}

// ───────────────────────────────────────────────────────────────
// Actuators (driven adapters: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Rip relay output.
pub trait RelayPort {
    /// `true` energises the relay (rip alarm / belt cutoff).
    ///
    /// Called with the latched level on every tick, so implementations
    /// should skip writes that would not change the output.
    fn set_relay(&mut self, asserted: bool);
}

/// Status indicator output.
pub trait IndicatorPort {
    fn set_indicator(&mut self, lit: bool);
}

// ───────────────────────────────────────────────────────────────
// Clock
// ───────────────────────────────────────────────────────────────

/// Monotonic time source.
pub trait ClockPort {
    fn now(&self) -> Timestamp;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → transport / logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits [`LoopEvent`]s through this port. Implementations
/// must not block the sampling loop.
pub trait EventSink {
    fn emit(&mut self, event: &LoopEvent);
}

impl<A: EventSink, B: EventSink> EventSink for (A, B) {
    fn emit(&mut self, event: &LoopEvent) {
        self.0.emit(event);
        self.1.emit(event);
    }
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: domain ↔ persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads and persists system configuration.
///
/// Implementations MUST validate before persisting. Invalid ranges are
/// rejected with [`ConfigError::ValidationFailed`], not silently clamped.
pub trait ConfigPort {
    /// Load configuration from persistent storage.
    /// Returns [`SystemConfig::default()`] if no stored config exists.
    fn load(&self) -> Result<SystemConfig, ConfigError>;

    /// Validate and persist configuration.
    fn save(&mut self, config: &SystemConfig) -> Result<(), ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConfigPort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Stored config failed deserialization.
    Corrupted,
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
    /// Generic I/O error from the storage backend.
    IoError,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl core::error::Error for ConfigError {}

impl From<ConfigError> for crate::error::Error {
    fn from(e: ConfigError) -> Self {
        match e {
            ConfigError::Corrupted => Self::Config("stored config corrupted"),
            ConfigError::ValidationFailed(msg) => Self::Config(msg),
            ConfigError::IoError => Self::Config("config storage I/O error"),
        }
    }
}
