//! Inbound supervisor commands.
//!
//! These arrive from outside the monitor (serial console, external
//! supervision) and are applied by the
//! [`MonitorService`](super::service::MonitorService) between ticks.

use crate::config::SystemConfig;

/// Commands that external adapters can send into the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum SupervisorCommand {
    /// Clear the latched alarm and return to waiting for the first loop.
    Reset,

    /// Validate and persist a configuration for the next boot.
    StageConfig(SystemConfig),
}

/// Why a console line was not turned into a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandError {
    Empty,
    Unknown,
    /// `CONFIG` payload was not a valid `SystemConfig` JSON object.
    BadPayload,
}

impl core::fmt::Display for CommandError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Empty => write!(f, "empty line"),
            Self::Unknown => write!(f, "unknown command"),
            Self::BadPayload => write!(f, "malformed CONFIG payload"),
        }
    }
}

impl SupervisorCommand {
    /// Parse one console line: `RESET` or `CONFIG <json>`.
    ///
    /// Keywords are case-insensitive. The JSON payload is only parsed here;
    /// range validation happens when the config is saved.
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let line = line.trim();
        if line.is_empty() {
            return Err(CommandError::Empty);
        }
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((w, r)) => (w, r.trim()),
            None => (line, ""),
        };

        if word.eq_ignore_ascii_case("RESET") && rest.is_empty() {
            Ok(Self::Reset)
        } else if word.eq_ignore_ascii_case("CONFIG") {
            serde_json::from_str::<SystemConfig>(rest)
                .map(Self::StageConfig)
                .map_err(|_| CommandError::BadPayload)
        } else {
            Err(CommandError::Unknown)
        }
    }
}
