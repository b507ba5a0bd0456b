//! `envstack init`: write a `.env` template for an environment.
//!
//! Invariants:
//! - Existing files are never overwritten without `--force`.
//! - Required variables come first; secrets are never pre-filled.

use std::fmt::{self, Write as _};
use std::path::Path;

use anyhow::{Result, bail};
use envstack_config::ConfigProfile;

use crate::config_context::ConfigContext;
use crate::output::write_to_file;

pub fn run(context: &ConfigContext, output_file: &Path, force: bool) -> Result<()> {
    if output_file.exists() && !force {
        bail!(
            "{} already exists; use --force to overwrite",
            output_file.display()
        );
    }

    let loader = context.manager.loader();
    let environment = loader.resolve_environment(context.options.environment.as_deref());
    let profile = loader.registry().get_profile(&environment)?;

    write_to_file(&render_template(profile)?, output_file)?;
    eprintln!(
        "Wrote {} template to {}",
        profile.environment,
        output_file.display()
    );
    Ok(())
}

fn required_names(profile: &ConfigProfile) -> Vec<&str> {
    let mut names: Vec<&str> = profile.required_env_vars.iter().map(String::as_str).collect();
    for definition in profile.definitions.iter().filter(|d| d.required) {
        if !names.contains(&definition.name.as_str()) {
            names.push(&definition.name);
        }
    }
    names
}

/// Render the `.env` template for `profile`.
pub(crate) fn render_template(profile: &ConfigProfile) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(out, "# envstack template for the '{}' environment", profile.environment)?;

    let required = required_names(profile);
    if !required.is_empty() {
        out.push_str("\n# Required\n");
        for name in &required {
            if let Some(description) = profile.definition(name).and_then(|d| d.description.as_deref()) {
                writeln!(out, "# {description}")?;
            }
            writeln!(out, "{name}=")?;
        }
    }

    out.push_str("\n# Optional\n");
    let mut written: Vec<&str> = Vec::new();
    for definition in &profile.definitions {
        let name = definition.name.as_str();
        if required.contains(&name) {
            continue;
        }
        if let Some(description) = &definition.description {
            writeln!(out, "# {description}")?;
        }
        match profile.env_var_defaults.get(name) {
            Some(value) => writeln!(out, "{name}={value}")?,
            None => writeln!(out, "# {name}=")?,
        }
        written.push(name);
    }

    for (name, value) in &profile.env_var_defaults {
        if !written.contains(&name.as_str()) && !required.contains(&name.as_str()) {
            writeln!(out, "{name}={value}")?;
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use envstack_config::{EnvVarDefinition, EnvVarKind};

    #[test]
    fn test_template_lists_required_then_optional() {
        let profile = ConfigProfile::new("qa")
            .with_required_env_var("DATABASE_URL")
            .with_env_var_default("PORT", "8080")
            .with_env_var_default("EXTRA", "1")
            .with_definition(
                EnvVarDefinition::new("DATABASE_URL", EnvVarKind::String)
                    .with_description("Database connection string"),
            )
            .with_definition(
                EnvVarDefinition::new("PORT", EnvVarKind::Number).with_description("HTTP listen port"),
            )
            .with_definition(EnvVarDefinition::new("CORS_ORIGINS", EnvVarKind::Array));

        let template = render_template(&profile).unwrap();

        assert_eq!(
            template,
            "# envstack template for the 'qa' environment\n\
             \n\
             # Required\n\
             # Database connection string\n\
             DATABASE_URL=\n\
             \n\
             # Optional\n\
             # HTTP listen port\n\
             PORT=8080\n\
             # CORS_ORIGINS=\n\
             EXTRA=1\n"
        );
    }
}
