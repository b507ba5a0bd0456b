//! CLI exit codes for scripting and automation.
//!
//! Responsibilities:
//! - Define structured exit codes that scripts can use to distinguish error types.
//! - Map ConfigError variants to appropriate exit codes.
//!
//! Does NOT handle:
//! - Error message formatting (handled by anyhow Display).
//!
//! Invariants:
//! - Exit codes 1-4 are reserved for specific error categories.

use envstack_config::ConfigError;

/// Structured exit codes for envstack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Success - command completed successfully.
    Success = 0,

    /// General error - unhandled or generic failure.
    GeneralError = 1,

    /// Validation failed - the configuration does not satisfy the schema,
    /// or a required variable could not be parsed.
    ValidationFailed = 2,

    /// Required environment variables are missing.
    ///
    /// Scripts should supply the variables (or secrets) and retry.
    MissingEnvVars = 3,

    /// No profile is registered for the requested environment.
    UnknownEnvironment = 4,
}

impl ExitCode {
    /// Convert the exit code to an i32 for use with std::process::exit().
    pub const fn as_i32(self) -> i32 {
        self as u8 as i32
    }
}

impl From<&ConfigError> for ExitCode {
    fn from(err: &ConfigError) -> Self {
        match err {
            ConfigError::UnknownEnvironment(_) => ExitCode::UnknownEnvironment,

            ConfigError::MissingRequiredVar(_) | ConfigError::MissingRequiredEnvVars(_) => {
                ExitCode::MissingEnvVars
            }

            ConfigError::ValidationFailed { .. } | ConfigError::SectionValidationFailed { .. } => {
                ExitCode::ValidationFailed
            }
            e if e.is_coercion_error() => ExitCode::ValidationFailed,

            _ => ExitCode::GeneralError,
        }
    }
}

/// Extension trait for anyhow::Error to extract exit codes.
pub trait ExitCodeExt {
    /// Extract the appropriate exit code from this error.
    ///
    /// Returns ExitCode::GeneralError if no ConfigError is in the chain.
    fn exit_code(&self) -> ExitCode;
}

impl ExitCodeExt for anyhow::Error {
    fn exit_code(&self) -> ExitCode {
        self.chain()
            .find_map(|cause| cause.downcast_ref::<ConfigError>())
            .map(ExitCode::from)
            .unwrap_or(ExitCode::GeneralError)
    }
}
