//! Command handlers and dispatch.

pub mod config_cmd;
pub mod devices;
pub mod dps;
pub mod resources;
pub mod util;
pub mod watch;

use thingly_core::Hub;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a parsed command to its handler.
pub async fn dispatch(command: Command, hub: &Hub, global: &GlobalOpts) -> Result<(), CliError> {
    match command {
        Command::Devices(args) => devices::handle(args, hub, global).await,
        Command::Resources(args) => resources::handle(args, hub, global).await,
        Command::Dps(args) => dps::handle(args, hub, global).await,
        Command::Watch(args) => watch::handle(args, hub, global).await,
        // Handled in main before a hub exists.
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
