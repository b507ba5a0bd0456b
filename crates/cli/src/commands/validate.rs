//! `envstack validate`: report every problem with the configuration.

use anyhow::Result;

use crate::config_context::ConfigContext;

pub fn run(context: &ConfigContext) -> Result<()> {
    let result = super::initialize(context)?;

    if result.is_valid() {
        println!("Configuration for '{}' is valid", result.environment);
        return Ok(());
    }

    println!(
        "Configuration for '{}' has {} problem(s)",
        result.environment,
        result.validation_errors.len()
    );
    for name in &result.missing_env_vars {
        println!("  missing: {name}");
    }
    Ok(())
}
