//! CLI argument definitions and parsing.
//!
//! Responsibilities:
//! - Define the CLI structure using clap derive macros.
//! - Parse `--var KEY=VALUE` overrides.
//!
//! Non-responsibilities:
//! - Does not execute commands (see `dispatch` module).
//! - Does not build the configuration manager (see `config_context` module).

use clap::{Parser, Subcommand, ValueEnum};
use envstack_config::ExportFormat;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "envstack")]
#[command(about = "Load, validate and export layered environment configuration", long_about = None)]
#[command(version)]
#[command(
    after_help = "Examples:\n  envstack validate --env production\n  envstack export --format env --output-file deploy.env\n  envstack inspect database\n  envstack --var PORT=4000 inspect --path app.port\n  envstack init --env staging --output-file .env.staging\n"
)]
pub struct Cli {
    /// Environment to load (development, staging, production, test).
    ///
    /// Defaults to APP_ENV, falling back to development.
    #[arg(short, long, global = true)]
    pub env: Option<String>,

    /// Set a variable for this run only (repeatable, wins over the process environment)
    #[arg(long = "var", global = true, value_name = "KEY=VALUE", value_parser = parse_key_val)]
    pub vars: Vec<(String, String)>,

    /// Fail on missing variables or validation errors instead of reporting them
    #[arg(long, global = true)]
    pub strict: bool,

    /// Skip schema validation
    #[arg(long, global = true)]
    pub no_validate: bool,

    /// Directory with one file per secret, consulted for missing required variables
    #[arg(long, global = true, env = "ENVSTACK_SECRETS_DIR", value_name = "DIR")]
    pub secrets_dir: Option<PathBuf>,

    /// Also consult the system keyring for missing required variables
    #[arg(long, global = true)]
    pub keyring: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load configuration and print a summary
    Load,

    /// Validate configuration and report every problem
    Validate,

    /// Export the redacted configuration
    Export {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = ExportFormatArg::Json)]
        format: ExportFormatArg,

        /// Write to a file instead of stdout
        #[arg(long, value_name = "FILE")]
        output_file: Option<PathBuf>,
    },

    /// Print the redacted configuration, one section, or one value
    Inspect {
        /// Top-level section to print (e.g. database)
        section: Option<String>,

        /// Dotted path to print (e.g. security.cors.origins)
        #[arg(long, conflicts_with = "section")]
        path: Option<String>,
    },

    /// Write a .env template for the selected environment
    Init {
        /// Template destination
        #[arg(long, value_name = "FILE", default_value = ".env")]
        output_file: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormatArg {
    Json,
    Env,
    Yaml,
}

impl From<ExportFormatArg> for ExportFormat {
    fn from(arg: ExportFormatArg) -> Self {
        match arg {
            ExportFormatArg::Json => ExportFormat::Json,
            ExportFormatArg::Env => ExportFormat::Env,
            ExportFormatArg::Yaml => ExportFormat::Yaml,
        }
    }
}

/// Parse a `KEY=VALUE` pair; the value may itself contain `=`.
fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid KEY=VALUE: no '=' found in '{s}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("invalid KEY=VALUE: empty key in '{s}'"));
    }
    Ok((key.to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_key_val() {
        assert_eq!(
            parse_key_val("DATABASE_URL=postgres://u:p@h/db?sslmode=require").unwrap(),
            (
                "DATABASE_URL".to_string(),
                "postgres://u:p@h/db?sslmode=require".to_string()
            )
        );
        assert_eq!(
            parse_key_val("EMPTY=").unwrap(),
            ("EMPTY".to_string(), String::new())
        );
        assert!(parse_key_val("NOEQUALS").is_err());
        assert!(parse_key_val("=value").is_err());
    }

    #[test]
    fn test_repeatable_vars_and_globals() {
        let cli = Cli::try_parse_from([
            "envstack", "inspect", "--var", "PORT=4000", "--var", "HOST=127.0.0.1", "-e", "test",
        ])
        .unwrap();
        assert_eq!(cli.vars.len(), 2);
        assert_eq!(cli.env.as_deref(), Some("test"));
        assert!(matches!(cli.command, Commands::Inspect { section: None, path: None }));
    }
}
