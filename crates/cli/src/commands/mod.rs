//! Command implementations.

pub mod export;
pub mod init;
pub mod inspect;
pub mod load;
pub mod validate;

use anyhow::{Context, Result};
use envstack_config::LoadResult;

use crate::config_context::ConfigContext;
use crate::output::print_diagnostics;

/// Initialize the manager and print the diagnostics of the load.
pub(crate) fn initialize(context: &ConfigContext) -> Result<LoadResult> {
    context
        .manager
        .initialize(context.options.clone())
        .context("Failed to load configuration")?;
    let result = context
        .manager
        .last_diagnostics()
        .context("Configuration loaded without diagnostics")?;
    print_diagnostics(&result);
    Ok(result)
}
