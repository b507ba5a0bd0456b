//! Error types for configuration loading and access.
//!
//! Responsibilities:
//! - Define error variants for every configuration failure mode.
//! - Carry enough context (variable names, paths, environment) for diagnostics.
//!
//! Does NOT handle:
//! - Secret provider failures (see `secrets::SecretError`).
//! - Mapping errors to process exit codes (see the CLI crate).
//!
//! Invariants:
//! - Parse errors carry the variable name but never a secret value.
//! - Dotenv errors NEVER include raw .env line contents to prevent secret leakage.
//! - `MiddlewareFailed` keeps the underlying error as its source.

use std::io::ErrorKind;

use thiserror::Error;

/// Errors that can occur while loading, validating or reading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Unknown environment '{0}': no profile registered")]
    UnknownEnvironment(String),

    #[error("Missing required environment variable: {0}")]
    MissingRequiredVar(String),

    #[error("Missing required environment variables: {}", .0.join(", "))]
    MissingRequiredEnvVars(Vec<String>),

    /// Only accepts case-insensitive `true` or `false`.
    ///
    /// SAFETY: the raw value is not included; it may be a secret.
    #[error("Invalid boolean for {var}: expected 'true' or 'false'")]
    InvalidBoolean { var: String },

    #[error("Invalid number for {var}")]
    InvalidNumber { var: String },

    #[error("Invalid JSON for {var}: {message}")]
    InvalidJson { var: String, message: String },

    #[error("Invalid value for {var}: {message}")]
    InvalidValue { var: String, message: String },

    #[error("Configuration validation failed for '{environment}': {}", .errors.join("; "))]
    ValidationFailed {
        environment: String,
        errors: Vec<String>,
    },

    #[error("Middleware '{middleware}' failed: {source}")]
    MiddlewareFailed {
        middleware: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Configuration not initialized. Call initialize() first")]
    NotInitialized,

    /// Raised when a watcher or middleware tries to start another load.
    #[error("Configuration load requested while a load is running on this thread")]
    ReentrantOperation,

    #[error("Configuration section '{0}' not found")]
    SectionNotFound(String),

    #[error("Configuration section '{section}' failed validation: {}", .errors.join("; "))]
    SectionValidationFailed {
        section: String,
        errors: Vec<String>,
    },

    #[error("Configuration section '{section}' has an unexpected shape: {source}")]
    SectionDeserialize {
        section: String,
        #[source]
        source: serde_json::Error,
    },

    /// Failed to parse the `.env` file.
    ///
    /// SAFETY: Only the error position is reported, never the line content.
    #[error(
        "Failed to parse .env file at position {error_index}. Hint: set DOTENV_DISABLED=1 to skip .env loading"
    )]
    DotenvParse { error_index: usize },

    /// Failed to read the `.env` file due to an I/O error.
    #[error("Failed to read .env file: {kind}")]
    DotenvIo { kind: ErrorKind },

    /// Unknown dotenv error (future variants from dotenvy crate).
    #[error("Failed to load .env file. Hint: set DOTENV_DISABLED=1 to skip .env loading")]
    DotenvUnknown,

    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to serialize configuration as YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl ConfigError {
    /// Whether this error came from parsing a single environment variable.
    pub fn is_coercion_error(&self) -> bool {
        matches!(
            self,
            ConfigError::InvalidBoolean { .. }
                | ConfigError::InvalidNumber { .. }
                | ConfigError::InvalidJson { .. }
                | ConfigError::InvalidValue { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_vars_message_lists_every_name() {
        let err = ConfigError::MissingRequiredEnvVars(vec![
            "DATABASE_URL".to_string(),
            "JWT_SECRET".to_string(),
        ]);
        assert_eq!(
            err.to_string(),
            "Missing required environment variables: DATABASE_URL, JWT_SECRET"
        );
    }

    #[test]
    fn test_invalid_boolean_does_not_echo_value() {
        let err = ConfigError::InvalidBoolean {
            var: "CORS_ENABLED".to_string(),
        };
        assert!(err.to_string().contains("CORS_ENABLED"));
        assert!(err.is_coercion_error());
        assert!(!ConfigError::NotInitialized.is_coercion_error());
    }
}
