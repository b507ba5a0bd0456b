//! `envstack export`: render the redacted configuration.

use std::path::Path;

use anyhow::{Context, Result};
use envstack_config::ExportFormat;

use crate::config_context::ConfigContext;
use crate::output::output_result;

pub fn run(context: &ConfigContext, format: ExportFormat, output_file: Option<&Path>) -> Result<()> {
    super::initialize(context)?;
    let mut rendered = context
        .manager
        .export(format)
        .with_context(|| format!("Failed to export configuration as {format}"))?;
    if !rendered.ends_with('\n') {
        rendered.push('\n');
    }
    output_result(&rendered, output_file)
}
