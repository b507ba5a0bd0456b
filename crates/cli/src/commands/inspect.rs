//! `envstack inspect`: print the redacted tree, a section, or a single value.

use anyhow::{Result, anyhow};
use envstack_config::ConfigError;
use envstack_config::tree::get_path;

use crate::config_context::ConfigContext;

pub fn run(context: &ConfigContext, section: Option<&str>, path: Option<&str>) -> Result<()> {
    super::initialize(context)?;
    let redacted = context.manager.redacted_config()?;

    let value = match (section, path) {
        (_, Some(path)) => get_path(&redacted, path)
            .ok_or_else(|| anyhow!("No configuration value at path '{path}'"))?,
        (Some(section), None) => redacted
            .get(section)
            .ok_or_else(|| ConfigError::SectionNotFound(section.to_string()))?,
        (None, None) => &redacted,
    };

    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
