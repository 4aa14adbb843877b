use std::process::ExitCode;

use autointl::cli::{Arguments, ExitStatus};
use clap::Parser;
use colored::Colorize;

fn main() -> ExitCode {
    let args = Arguments::parse();
    let verbose = args.verbose();

    match autointl::cli::run_cli(args) {
        Ok(code) => code,
        Err(err) => {
            if verbose {
                eprintln!("{} {:?}", "error:".bold().red(), err);
            } else {
                eprintln!("{} {:#}", "error:".bold().red(), err);
            }
            ExitStatus::Error.into()
        }
    }
}
