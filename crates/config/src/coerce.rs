//! Environment variable coercion into typed configuration values.
//!
//! Responsibilities:
//! - Describe typed environment variables (`EnvVarDefinition`).
//! - Parse raw string values according to a definition.
//! - Infer a type for variables that have no definition.
//!
//! Does NOT handle:
//! - Deciding which variables are required for an environment (see `profile`).
//! - Placing values in the configuration tree (see `tree::path`).
//!
//! Invariants:
//! - Coercion is pure: no environment access, no logging.
//! - An absent optional variable without a default yields `None`, never `Null`.
//! - Defaults are returned as given; they are already typed.

use std::fmt;
use std::sync::Arc;

use serde_json::{Number, Value};

use crate::error::ConfigError;

/// Declared type of an environment variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvVarKind {
    String,
    Number,
    Boolean,
    Array,
    Json,
}

impl EnvVarKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnvVarKind::String => "string",
            EnvVarKind::Number => "number",
            EnvVarKind::Boolean => "boolean",
            EnvVarKind::Array => "array",
            EnvVarKind::Json => "json",
        }
    }
}

type ValueCheck = Arc<dyn Fn(&Value) -> Result<(), String> + Send + Sync>;

/// Typed description of a single environment variable.
#[derive(Clone)]
pub struct EnvVarDefinition {
    pub name: String,
    pub kind: EnvVarKind,
    pub required: bool,
    pub default: Option<Value>,
    pub description: Option<String>,
    validate: Option<ValueCheck>,
}

impl EnvVarDefinition {
    pub fn new(name: impl Into<String>, kind: EnvVarKind) -> Self {
        Self {
            name: name.into(),
            kind,
            required: false,
            default: None,
            description: None,
            validate: None,
        }
    }

    /// Mark the variable as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Attach a check that runs on the parsed value.
    ///
    /// Returning `Err(message)` rejects the value with that message.
    pub fn with_validator<F>(mut self, check: F) -> Self
    where
        F: Fn(&Value) -> Result<(), String> + Send + Sync + 'static,
    {
        self.validate = Some(Arc::new(check));
        self
    }
}

impl fmt::Debug for EnvVarDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvVarDefinition")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("required", &self.required)
            .field("default", &self.default)
            .field("description", &self.description)
            .field("validate", &self.validate.is_some())
            .finish()
    }
}

/// Coerce a raw value according to its definition.
///
/// Returns `Ok(None)` when the variable is absent, optional and has no default.
pub fn coerce(definition: &EnvVarDefinition, raw: Option<&str>) -> Result<Option<Value>, ConfigError> {
    let raw = match raw {
        Some(raw) => raw,
        None => {
            if definition.required {
                return Err(ConfigError::MissingRequiredVar(definition.name.clone()));
            }
            return Ok(definition.default.clone());
        }
    };

    let parsed = parse_kind(&definition.name, definition.kind, raw)?;

    if let Some(check) = &definition.validate {
        check(&parsed).map_err(|message| ConfigError::InvalidValue {
            var: definition.name.clone(),
            message,
        })?;
    }

    Ok(Some(parsed))
}

fn parse_kind(var: &str, kind: EnvVarKind, raw: &str) -> Result<Value, ConfigError> {
    match kind {
        EnvVarKind::String => Ok(Value::String(raw.to_string())),
        EnvVarKind::Boolean => parse_bool(raw).ok_or_else(|| ConfigError::InvalidBoolean {
            var: var.to_string(),
        }),
        EnvVarKind::Number => parse_number(raw).ok_or_else(|| ConfigError::InvalidNumber {
            var: var.to_string(),
        }),
        EnvVarKind::Array => Ok(split_list(raw)),
        EnvVarKind::Json => serde_json::from_str(raw).map_err(|e| ConfigError::InvalidJson {
            var: var.to_string(),
            message: e.to_string(),
        }),
    }
}

fn parse_bool(raw: &str) -> Option<Value> {
    if raw.eq_ignore_ascii_case("true") {
        Some(Value::Bool(true))
    } else if raw.eq_ignore_ascii_case("false") {
        Some(Value::Bool(false))
    } else {
        None
    }
}

/// Parse a float, storing integral values as integers.
fn parse_number(raw: &str) -> Option<Value> {
    let trimmed = raw.trim();
    if let Ok(int) = trimmed.parse::<i64>() {
        return Some(Value::Number(int.into()));
    }
    let float: f64 = trimmed.parse().ok()?;
    if !float.is_finite() {
        return None;
    }
    Number::from_f64(float).map(Value::Number)
}

fn split_list(raw: &str) -> Value {
    Value::Array(
        raw.split(',')
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .map(|segment| Value::String(segment.to_string()))
            .collect(),
    )
}

/// Infer a typed value for a variable without a definition.
///
/// Digit-only strings become numbers, exact `true`/`false` become booleans,
/// `{`/`[` prefixed strings become JSON when they parse, comma-separated
/// strings become arrays, anything else stays a string.
pub fn infer(raw: &str) -> Value {
    if !raw.is_empty()
        && raw.bytes().all(|b| b.is_ascii_digit())
        && let Some(number) = parse_number(raw)
    {
        return number;
    }

    match raw {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        _ => {}
    }

    if (raw.starts_with('{') || raw.starts_with('['))
        && let Ok(json) = serde_json::from_str::<Value>(raw)
    {
        return json;
    }

    if raw.contains(',') {
        return split_list(raw);
    }

    Value::String(raw.to_string())
}
