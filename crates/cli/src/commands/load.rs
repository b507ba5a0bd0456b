//! `envstack load`: load configuration and print a summary.

use anyhow::Result;

use crate::config_context::ConfigContext;

pub fn run(context: &ConfigContext) -> Result<()> {
    let result = super::initialize(context)?;

    let sections: Vec<&str> = result
        .config
        .as_object()
        .map(|map| map.keys().map(String::as_str).collect())
        .unwrap_or_default();

    println!("Environment: {}", result.environment);
    println!("Sections: {}", sections.join(", "));
    if result.is_valid() {
        println!("Status: valid");
    } else {
        println!(
            "Status: {} problem(s), {} missing variable(s)",
            result.validation_errors.len(),
            result.missing_env_vars.len()
        );
    }
    if !result.warnings.is_empty() {
        println!("Warnings: {}", result.warnings.len());
    }
    Ok(())
}
