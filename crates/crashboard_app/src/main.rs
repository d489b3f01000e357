mod cli;
mod config;
mod platform;

use std::process::ExitCode;

use clap::Parser;
use crashboard_logging::crash_error;

fn main() -> ExitCode {
    let cli = cli::Cli::parse();
    match platform::run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            crash_error!("{:#}", err);
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
