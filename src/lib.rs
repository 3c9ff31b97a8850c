//! BeltGuard firmware library.
//!
//! Exposes the pure-logic modules for integration testing and the firmware
//! binary. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod belt;
pub mod config;
pub mod error;
pub mod indicator;
pub mod pins;

// The ESP-IDF-facing modules compile on the host too; their hardware
// access is replaced by cfg-gated simulation stubs.
pub mod adapters;
pub mod drivers;
pub mod sensors;

pub use error::{Error, Result};
