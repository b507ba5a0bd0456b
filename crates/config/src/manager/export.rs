//! Rendering of (already redacted) trees for export.
//!
//! Invariants:
//! - Callers pass redacted trees; nothing here looks at secret values.
//! - `Env` output covers only `ENV_EXPORT_VARS`, skipping absent paths.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::constants::ENV_EXPORT_VARS;
use crate::error::ConfigError;
use crate::tree::{PathMapper, get_path};

/// Output format for `ConfigManager::export`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Pretty-printed JSON of the whole tree.
    Json,
    /// `KEY=value` lines for the operational subset of variables.
    Env,
    Yaml,
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExportFormat::Json => "json",
            ExportFormat::Env => "env",
            ExportFormat::Yaml => "yaml",
        };
        f.write_str(name)
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "env" | "dotenv" => Ok(ExportFormat::Env),
            "yaml" | "yml" => Ok(ExportFormat::Yaml),
            other => Err(format!("unknown export format '{other}'")),
        }
    }
}

pub(crate) fn render(
    tree: &Value,
    format: ExportFormat,
    mapper: &PathMapper,
) -> Result<String, ConfigError> {
    match format {
        ExportFormat::Json => Ok(serde_json::to_string_pretty(tree)?),
        ExportFormat::Yaml => Ok(serde_yaml::to_string(tree)?),
        ExportFormat::Env => Ok(render_env(tree, mapper)),
    }
}

fn render_env(tree: &Value, mapper: &PathMapper) -> String {
    let mut out = String::new();
    for name in ENV_EXPORT_VARS {
        let Some(path) = mapper.path_for(name) else {
            continue;
        };
        let Some(value) = get_path(tree, path) else {
            continue;
        };
        if value.is_null() {
            continue;
        }
        out.push_str(name);
        out.push('=');
        out.push_str(&quote(&env_value(value)));
        out.push('\n');
    }
    out
}

fn env_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(","),
        other => other.to_string(),
    }
}

/// Double-quote values a dotenv parser would otherwise split or truncate.
fn quote(value: &str) -> String {
    let needs_quotes = value
        .chars()
        .any(|c| c.is_whitespace() || matches!(c, '#' | '"' | '\'' | '\\' | '$'));
    if !needs_quotes {
        return value.to_string();
    }
    let escaped = value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n");
    format!("\"{escaped}\"")
}
