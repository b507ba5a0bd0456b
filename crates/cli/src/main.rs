//! envstack - inspect, validate and export layered environment configuration.
//!
//! Responsibilities:
//! - Parse command-line arguments.
//! - Load `.env` before parsing so its values reach the loaded configuration.
//! - Install logging and map failures to structured exit codes.
//!
//! Does NOT handle:
//! - Loading, validating or redacting configuration (see `crates/config`).
//!
//! Invariants:
//! - `load_dotenv()` is called BEFORE CLI parsing and is gated by `DOTENV_DISABLED`.
//! - Logs go to stderr; stdout carries only command output.

mod args;
mod commands;
mod config_context;
mod dispatch;
mod error;
mod output;

use args::Cli;
use clap::Parser;
use dispatch::run_command;
use error::{ExitCode, ExitCodeExt};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() {
    // Load .env file BEFORE CLI parsing so its variables are part of the process environment
    if let Err(e) = envstack_config::load_dotenv() {
        eprintln!("Failed to load environment: {}", e);
        std::process::exit(ExitCode::GeneralError.as_i32());
    }

    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let exit_code = match run_command(cli) {
        Ok(()) => ExitCode::Success,
        Err(e) => {
            eprintln!("{:#}", e);
            e.exit_code()
        }
    };

    std::process::exit(exit_code.as_i32());
}
