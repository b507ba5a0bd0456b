//! Layered, environment-aware configuration for envstack.
//!
//! This crate builds a validated configuration tree from a per-environment
//! profile (static defaults) overlaid with values from environment variables,
//! and manages its lifecycle: load, middleware, change notification, reload,
//! environment switching, and redacted export.

pub mod coerce;
pub mod constants;
pub mod error;
mod loader;
pub mod manager;
pub mod profile;
pub mod redact;
pub mod schema;
pub mod secrets;
pub mod tree;

pub use coerce::{EnvVarDefinition, EnvVarKind};
pub use error::ConfigError;
pub use loader::{
    ConfigLoader, EnvironmentResolver, LoadOptions, LoadResult, env_var_or_none, load_dotenv,
    process_env_vars, process_environment_resolver,
};
pub use manager::{
    ChangeEvent, ConfigChanges, ConfigManager, ExportFormat, ManagerState, Middleware,
    MiddlewareId, SectionOptions, WatcherError, WatcherId,
};
pub use profile::{ConfigProfile, ProfileRegistry};
pub use redact::SecretRedactor;
pub use schema::{Field, ObjectSchema, Schema, SchemaValidator, ValidationOutcome};
pub use secrets::{SecretError, SecretManager, SecretProvider};
pub use tree::{ConfigTree, PathMapper};
