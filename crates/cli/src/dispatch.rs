//! Command dispatch logic.
//!
//! Responsibilities:
//! - Route parsed CLI arguments to appropriate command handlers.
//! - Build the configuration context shared by all commands.
//!
//! Does NOT handle:
//! - CLI structure definitions (see `args` module).
//!
//! Invariants:
//! - Commands are routed based on the top-level Commands enum variant.

use anyhow::Result;

use crate::args::{Cli, Commands};
use crate::commands;
use crate::config_context::ConfigContext;

/// Dispatch CLI commands to their respective handlers.
pub(crate) fn run_command(cli: Cli) -> Result<()> {
    let context = ConfigContext::from_cli(&cli);

    match cli.command {
        Commands::Load => commands::load::run(&context),
        Commands::Validate => commands::validate::run(&context),
        Commands::Export {
            format,
            output_file,
        } => commands::export::run(&context, format.into(), output_file.as_deref()),
        Commands::Inspect { section, path } => {
            commands::inspect::run(&context, section.as_deref(), path.as_deref())
        }
        Commands::Init { output_file, force } => {
            commands::init::run(&context, &output_file, force)
        }
    }
}
