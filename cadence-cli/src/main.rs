//! Cadence CLI - Command-line interface
//!
//! Loads catalog documents and reports what was found.

mod commands;

use std::process::ExitCode;

use anyhow::Context;
use cadence_core::tracing_setup::{CliLogLevel, init_tracing};
use clap::Parser;

/// Exit status for a load that could not start at all.
const FATAL_EXIT: u8 = 2;

#[derive(Parser)]
#[command(name = "cadence")]
#[command(about = "Loads plain-text music and podcast catalogs")]
#[command(version)]
struct Cli {
    /// Console log level
    #[arg(long, global = true, value_enum, default_value_t = CliLogLevel::Warn)]
    log_level: CliLogLevel,

    #[command(subcommand)]
    command: commands::Commands,
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_tracing_level(), None).context("failed to initialize tracing")?;

    match commands::handle_command(cli.command) {
        Ok(code) => Ok(code),
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            eprintln!("Error: {}", e.user_message());
            Ok(ExitCode::from(FATAL_EXIT))
        }
    }
}
