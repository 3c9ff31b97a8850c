//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter       | Implements             | Connects to              |
//! |---------------|------------------------|--------------------------|
//! | `hardware`    | VoltagePort, RelayPort | ESP32 ADC1, relay GPIO   |
//! |               | IndicatorPort          | Status LED GPIO          |
//! | `status_link` | EventSink              | Frame queue → UART line  |
//! | `log_sink`    | EventSink              | Serial log output        |
//! | `console`     | —                      | Supervisor command input |
//! | `nvs`         | ConfigPort             | NVS / in-memory store    |
//! | `time`        | ClockPort              | ESP32 system timer       |

pub mod console;
pub mod hardware;
pub mod log_sink;
pub mod nvs;
pub mod status_link;
pub mod time;
