//! Sensor drivers.

pub mod sense_line;
