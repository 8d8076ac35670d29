//! Command dispatch: bridges CLI args -> speaker operations -> output.

pub mod config_cmd;
pub mod files;
pub mod info;
pub mod play;
pub mod status;
pub mod upload;
pub mod volume;

use tannoy_core::Speaker;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a speaker-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, speaker: &Speaker, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Info => info::handle(speaker, global),
        Command::Status => status::handle(speaker, global).await,
        Command::Files => files::handle(speaker, global).await,
        Command::Volume { level } => volume::handle(speaker, level, global).await,
        Command::Upload { path, name } => upload::handle(speaker, &path, name, global).await,
        Command::Play { target, name } => play::handle(speaker, &target, name, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
