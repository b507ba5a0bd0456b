//! Builds the configuration manager and load options from CLI arguments.
//!
//! Responsibilities:
//! - Collect process environment variables and `--var` overrides into `LoadOptions`.
//! - Wire optional secret providers (`--secrets-dir`, `--keyring`).
//!
//! Does NOT handle:
//! - Running commands (see `dispatch`).
//!
//! Invariants:
//! - `--var` values win over process environment variables.
//! - `--strict` turns diagnostics into errors (`throw_on_error`).

use envstack_config::secrets::{FileSecretProvider, KeyringSecretProvider};
use envstack_config::{ConfigLoader, ConfigManager, LoadOptions, SecretManager, process_env_vars};

use crate::args::Cli;

pub(crate) struct ConfigContext {
    pub manager: ConfigManager,
    pub options: LoadOptions,
}

impl ConfigContext {
    pub(crate) fn from_cli(cli: &Cli) -> Self {
        let mut loader = ConfigLoader::new();

        if cli.secrets_dir.is_some() || cli.keyring {
            let mut secrets = SecretManager::new();
            if let Some(dir) = &cli.secrets_dir {
                secrets = secrets.with_provider(FileSecretProvider::new(dir));
            }
            if cli.keyring {
                secrets = secrets.with_provider(KeyringSecretProvider::default());
            }
            loader = loader.with_secret_manager(secrets);
        }

        let mut options = LoadOptions::new()
            .with_env_vars(process_env_vars())
            .with_env_vars(cli.vars.iter().cloned());
        options.environment = cli.env.clone();
        options.validate = !cli.no_validate;
        options.throw_on_error = cli.strict;

        tracing::debug!(
            environment = ?options.environment,
            env_vars = options.env_vars.len(),
            strict = cli.strict,
            secrets_dir = cli.secrets_dir.is_some(),
            keyring = cli.keyring,
            "Built configuration context"
        );

        Self {
            manager: ConfigManager::with_loader(loader),
            options,
        }
    }
}
