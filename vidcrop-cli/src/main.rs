// vidcrop-cli/src/main.rs
//
// Entry point for the vidcrop command-line tool. Parses arguments, sets up
// logging (env_logger, RUST_LOG-driven, info by default), and dispatches to
// the subcommand implementations. Any error reaching main is logged and
// mapped to a non-zero exit code.

mod cli;
mod commands;
mod error;

use clap::Parser;
use cli::{Cli, Commands};
use log::error;

use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Crop(args) => commands::crop::run_crop(args),
        Commands::Plot(args) => commands::plot::run_plot(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
