//! Command dispatch: bridges CLI args -> core calls -> output formatting.

pub mod config_cmd;
pub mod devices;
pub mod read;
pub mod watch;

use canary_config::Config;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a command that talks to the vendor API.
pub async fn dispatch(cmd: Command, cfg: &Config, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Devices => devices::handle(cfg, global).await,
        Command::Read(args) => read::handle(args, cfg, global).await,
        Command::Watch(args) => watch::handle(args, cfg, global).await,
        Command::Config(args) => config_cmd::handle(&args, cfg, global),
    }
}
