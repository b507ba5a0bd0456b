//! Environment profiles and their registry.
//!
//! Responsibilities:
//! - Define `ConfigProfile`: defaults, env-var defaults, required vars and
//!   typed env-var definitions for one named environment.
//! - Hold registered profiles and look them up by environment name.
//! - Provide the built-in `development`, `staging`, `production` and `test` profiles.
//!
//! Does NOT handle:
//! - Reading the process environment (see `loader::env`).
//! - Merging or validating trees (see `loader`).
//!
//! Invariants:
//! - Looking up an unregistered environment is a hard `UnknownEnvironment` error.
//! - Profiles are immutable after registration; re-registering replaces the profile.
//! - Each profile's defaults are an independent tree.

mod builtin;

use std::collections::BTreeMap;

use serde_json::Value;

use crate::coerce::EnvVarDefinition;
use crate::error::ConfigError;
use crate::tree::empty_tree;

pub use builtin::{development_profile, production_profile, staging_profile, test_profile};

/// Static configuration bundle for one environment.
#[derive(Debug, Clone)]
pub struct ConfigProfile {
    pub environment: String,
    /// Partial configuration tree.
    pub defaults: Value,
    /// Values used for environment variables the caller does not supply.
    pub env_var_defaults: BTreeMap<String, String>,
    pub required_env_vars: Vec<String>,
    /// Typed definitions; variables without one are coerced heuristically.
    pub definitions: Vec<EnvVarDefinition>,
}

impl ConfigProfile {
    pub fn new(environment: impl Into<String>) -> Self {
        Self {
            environment: environment.into(),
            defaults: empty_tree(),
            env_var_defaults: BTreeMap::new(),
            required_env_vars: Vec::new(),
            definitions: Vec::new(),
        }
    }

    pub fn with_defaults(mut self, defaults: Value) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn with_env_var_default(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_var_defaults.insert(name.into(), value.into());
        self
    }

    pub fn with_required_env_var(mut self, name: impl Into<String>) -> Self {
        self.required_env_vars.push(name.into());
        self
    }

    pub fn with_definition(mut self, definition: EnvVarDefinition) -> Self {
        self.definitions.push(definition);
        self
    }

    pub fn definition(&self, name: &str) -> Option<&EnvVarDefinition> {
        self.definitions.iter().find(|def| def.name == name)
    }
}

/// Registry of profiles keyed by environment name.
#[derive(Debug, Clone, Default)]
pub struct ProfileRegistry {
    profiles: BTreeMap<String, ConfigProfile>,
}

impl ProfileRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the four built-in profiles.
    pub fn with_builtin_profiles() -> Self {
        let mut registry = Self::new();
        registry.register_profile(development_profile());
        registry.register_profile(staging_profile());
        registry.register_profile(production_profile());
        registry.register_profile(test_profile());
        registry
    }

    pub fn register_profile(&mut self, profile: ConfigProfile) {
        let environment = profile.environment.clone();
        if self.profiles.insert(environment.clone(), profile).is_some() {
            tracing::debug!(environment = %environment, "Replaced registered profile");
        }
    }

    pub fn get_profile(&self, environment: &str) -> Result<&ConfigProfile, ConfigError> {
        self.profiles
            .get(environment)
            .ok_or_else(|| ConfigError::UnknownEnvironment(environment.to_string()))
    }

    pub fn contains(&self, environment: &str) -> bool {
        self.profiles.contains_key(environment)
    }

    /// Registered environment names, sorted.
    pub fn environments(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(String::as_str)
    }
}
