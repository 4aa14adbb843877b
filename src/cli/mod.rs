//! Command-line interface.
//!
//! - `args`: clap definitions
//! - `commands`: one handler per subcommand
//! - `report`: cargo-style output
//! - `exit_status`: process exit codes

use std::process::ExitCode;

use anyhow::Result;

pub mod args;
pub mod commands;
pub mod exit_status;
pub mod report;

pub use args::{Arguments, Command};
pub use exit_status::ExitStatus;

use commands::{extract::extract, init::init};

pub fn run_cli(args: Arguments) -> Result<ExitCode> {
    let Some(Arguments { command }) = args.with_command_or_help() else {
        return Ok(ExitStatus::Success.into());
    };

    let status = match command {
        Some(Command::Extract(cmd)) => extract(cmd)?,
        Some(Command::Init) => init()?,
        None => ExitStatus::Success,
    };

    Ok(status.into())
}
