//! Application core: orchestration around the belt monitor, zero I/O.
//!
//! All interaction with hardware happens through **port traits** defined
//! in [`ports`], keeping this layer fully testable without real peripherals.

pub mod commands;
pub mod ports;
pub mod service;
