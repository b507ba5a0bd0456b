//! Load options and results.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;

/// Options for a single `ConfigLoader::load` call.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Explicit environment; resolved from the process when `None`.
    pub environment: Option<String>,
    /// Supplied environment variables; win over profile env-var defaults.
    pub env_vars: BTreeMap<String, String>,
    /// Run the schema validator.
    pub validate: bool,
    /// Turn missing variables and validation errors into `Err`.
    pub throw_on_error: bool,
    /// Overlay env-derived values on profile defaults.
    pub merge_with_defaults: bool,
    /// Consult the per-environment cache before loading.
    pub use_cache: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            environment: None,
            env_vars: BTreeMap::new(),
            validate: true,
            throw_on_error: false,
            merge_with_defaults: true,
            use_cache: true,
        }
    }
}

impl LoadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Layer these options over `remembered`.
    ///
    /// An unset environment keeps the remembered one and supplied variables
    /// are added to the remembered ones, winning on conflict. Flags are taken
    /// from `self`.
    pub fn layered_over(self, remembered: &LoadOptions) -> Self {
        let mut env_vars = remembered.env_vars.clone();
        env_vars.extend(self.env_vars);
        Self {
            environment: self.environment.or_else(|| remembered.environment.clone()),
            env_vars,
            ..self
        }
    }

    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = Some(environment.into());
        self
    }

    pub fn with_env_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars.insert(name.into(), value.into());
        self
    }

    pub fn with_env_vars<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.env_vars
            .extend(vars.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn without_validation(mut self) -> Self {
        self.validate = false;
        self
    }

    pub fn throw_on_error(mut self) -> Self {
        self.throw_on_error = true;
        self
    }

    pub fn without_defaults_merge(mut self) -> Self {
        self.merge_with_defaults = false;
        self
    }

    pub fn bypass_cache(mut self) -> Self {
        self.use_cache = false;
        self
    }
}

/// Outcome of one load: the tree plus every diagnostic collected on the way.
///
/// Check `validation_errors` and `missing_env_vars` before trusting `config`;
/// in non-throwing mode an invalid tree is still returned.
#[derive(Debug, Clone)]
pub struct LoadResult {
    pub config: Arc<Value>,
    pub environment: String,
    pub validation_errors: Vec<String>,
    pub missing_env_vars: Vec<String>,
    pub warnings: Vec<String>,
    /// Served from the cache without re-validation.
    pub from_cache: bool,
}

impl LoadResult {
    pub(crate) fn cached(config: Arc<Value>, environment: String) -> Self {
        Self {
            config,
            environment,
            validation_errors: Vec::new(),
            missing_env_vars: Vec::new(),
            warnings: Vec::new(),
            from_cache: true,
        }
    }

    /// No validation errors and no missing variables.
    pub fn is_valid(&self) -> bool {
        self.validation_errors.is_empty() && self.missing_env_vars.is_empty()
    }

    pub fn has_diagnostics(&self) -> bool {
        !self.is_valid() || !self.warnings.is_empty()
    }
}
