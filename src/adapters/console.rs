//! Line-oriented supervisor console.
//!
//! Reads commands (`RESET`, `CONFIG <json>`) from a text stream and raises
//! them for the sampling loop, which applies at most one per tick.

use std::io::BufRead;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use log::{info, warn};

use crate::app::commands::{CommandError, SupervisorCommand};

pub type CommandSignal = Signal<CriticalSectionRawMutex, SupervisorCommand>;

/// Read lines until EOF or a read error, signalling each parsed command.
///
/// A newer command replaces one the sampling loop has not yet taken.
pub fn run_console(reader: impl BufRead, commands: &CommandSignal) {
    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!("console: read error: {}", e);
                break;
            }
        };
        match SupervisorCommand::parse(&line) {
            Ok(cmd) => {
                info!("console: {} queued", command_name(&cmd));
                commands.signal(cmd);
            }
            Err(CommandError::Empty) => {}
            Err(e) => warn!("console: ignored {:?}: {}", line.trim(), e),
        }
    }
    info!("console: input closed");
}

fn command_name(cmd: &SupervisorCommand) -> &'static str {
    match cmd {
        SupervisorCommand::Reset => "RESET",
        SupervisorCommand::StageConfig(_) => "CONFIG",
    }
}
