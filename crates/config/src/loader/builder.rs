//! Configuration loader implementation.
//!
//! Responsibilities:
//! - Resolve the target environment and fetch its profile.
//! - Merge supplied env vars and secrets over profile env-var defaults,
//!   detect missing required vars, and coerce values.
//! - Map coerced values onto the tree, overlay them on profile defaults and
//!   validate the result.
//! - Cache clean results per environment.
//!
//! Does NOT handle:
//! - Middleware, watchers or lifecycle state (see `manager`).
//! - Reading `.env` files (see `load_dotenv`).
//!
//! Invariants / Assumptions:
//! - Supplied env vars win over secrets; secrets win over profile env-var
//!   defaults and definition defaults. A failed secret lookup falls back to
//!   those defaults.
//! - Env-derived values win over profile defaults.
//! - Blank values count as unset.
//! - Only results with no validation errors and no missing vars are cached.
//! - A cache hit returns the same `Arc` and skips re-validation.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use secrecy::ExposeSecret;
use serde_json::Value;

use super::cache::ConfigCache;
use super::env::{EnvironmentResolver, is_blank, process_environment_resolver};
use super::options::{LoadOptions, LoadResult};
use crate::coerce::{coerce, infer};
use crate::constants::FALLBACK_ENVIRONMENT;
use crate::error::ConfigError;
use crate::profile::{ConfigProfile, ProfileRegistry};
use crate::schema::{SchemaValidator, application_schema};
use crate::secrets::SecretManager;
use crate::tree::{PathMapper, merge};

/// Loads validated configuration trees for named environments.
pub struct ConfigLoader {
    registry: Arc<ProfileRegistry>,
    validator: Arc<dyn SchemaValidator>,
    mapper: PathMapper,
    secrets: Option<Arc<SecretManager>>,
    resolver: EnvironmentResolver,
    cache: ConfigCache,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ConfigLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigLoader")
            .field("environments", &self.registry.environments().collect::<Vec<_>>())
            .field("secrets", &self.secrets.is_some())
            .finish_non_exhaustive()
    }
}

/// Problems collected while building one candidate tree.
#[derive(Default)]
struct Diagnostics {
    validation_errors: Vec<String>,
    missing_env_vars: Vec<String>,
    warnings: Vec<String>,
}

impl ConfigLoader {
    /// Loader over the built-in profiles, application schema and default mappings.
    pub fn new() -> Self {
        Self {
            registry: Arc::new(ProfileRegistry::with_builtin_profiles()),
            validator: Arc::new(application_schema()),
            mapper: PathMapper::default(),
            secrets: None,
            resolver: process_environment_resolver(),
            cache: ConfigCache::default(),
        }
    }

    pub fn with_registry(mut self, registry: ProfileRegistry) -> Self {
        self.registry = Arc::new(registry);
        self.cache.clear();
        self
    }

    pub fn with_validator<V: SchemaValidator + 'static>(mut self, validator: V) -> Self {
        self.validator = Arc::new(validator);
        self.cache.clear();
        self
    }

    pub fn with_path_mapper(mut self, mapper: PathMapper) -> Self {
        self.mapper = mapper;
        self.cache.clear();
        self
    }

    pub fn with_secret_manager(mut self, secrets: SecretManager) -> Self {
        self.secrets = Some(Arc::new(secrets));
        self
    }

    /// Replace the source of the "current environment" indicator.
    pub fn with_environment_resolver<F>(mut self, resolver: F) -> Self
    where
        F: Fn() -> Option<String> + Send + Sync + 'static,
    {
        self.resolver = Arc::new(resolver);
        self
    }

    pub fn registry(&self) -> &ProfileRegistry {
        &self.registry
    }

    pub fn validator(&self) -> &dyn SchemaValidator {
        self.validator.as_ref()
    }

    pub fn path_mapper(&self) -> &PathMapper {
        &self.mapper
    }

    pub fn secret_manager(&self) -> Option<&SecretManager> {
        self.secrets.as_deref()
    }

    /// Environment a load with `explicit` would target.
    ///
    /// Explicit names are returned as given. A resolved name that matches no
    /// registered profile falls back to `development` with a warning.
    pub fn resolve_environment(&self, explicit: Option<&str>) -> String {
        if let Some(environment) = explicit {
            return environment.to_string();
        }

        match (self.resolver)() {
            Some(environment) if self.registry.contains(&environment) => environment,
            Some(environment) => {
                tracing::warn!(
                    environment = %environment,
                    fallback = FALLBACK_ENVIRONMENT,
                    "Unrecognized environment, falling back"
                );
                FALLBACK_ENVIRONMENT.to_string()
            }
            None => FALLBACK_ENVIRONMENT.to_string(),
        }
    }

    /// Load the configuration tree for the resolved environment.
    ///
    /// # Errors
    ///
    /// - `UnknownEnvironment` when no profile is registered for the environment.
    /// - With `throw_on_error`: `MissingRequiredEnvVars`, the first coercion
    ///   error of a required variable, or `ValidationFailed`.
    pub fn load(&self, options: &LoadOptions) -> Result<LoadResult, ConfigError> {
        let environment = self.resolve_environment(options.environment.as_deref());

        if options.use_cache
            && let Some(config) = self.cache.get(&environment)
        {
            tracing::debug!(environment = %environment, "Configuration served from cache");
            return Ok(LoadResult::cached(config, environment));
        }

        let profile = self.registry.get_profile(&environment)?;
        let mut diagnostics = Diagnostics::default();

        let mut effective = profile.env_var_defaults.clone();
        effective.extend(self.resolve_secrets(profile, &options.env_vars));
        effective.extend(
            options
                .env_vars
                .iter()
                .filter(|(_, value)| !is_blank(value))
                .map(|(name, value)| (name.clone(), value.clone())),
        );

        diagnostics.missing_env_vars = find_missing(profile, &effective);
        if !diagnostics.missing_env_vars.is_empty() {
            if options.throw_on_error {
                return Err(ConfigError::MissingRequiredEnvVars(
                    diagnostics.missing_env_vars,
                ));
            }
            diagnostics.validation_errors.push(format!(
                "Missing required environment variables: {}",
                diagnostics.missing_env_vars.join(", ")
            ));
        }

        let coerced =
            self.coerce_all(profile, &effective, options.throw_on_error, &mut diagnostics)?;
        let overlay = self
            .mapper
            .map_env(coerced.iter().map(|(name, value)| (name.as_str(), value.clone())));

        let candidate = if options.merge_with_defaults {
            merge(&profile.defaults, &overlay)
        } else {
            profile.defaults.clone()
        };

        let config = if options.validate {
            let outcome = self.validator.validate(&candidate);
            if outcome.valid {
                outcome.data.unwrap_or(candidate)
            } else {
                diagnostics.validation_errors.extend(outcome.errors);
                if options.throw_on_error {
                    return Err(ConfigError::ValidationFailed {
                        environment,
                        errors: diagnostics.validation_errors,
                    });
                }
                candidate
            }
        } else {
            candidate
        };

        let config = Arc::new(config);
        let clean =
            diagnostics.validation_errors.is_empty() && diagnostics.missing_env_vars.is_empty();
        if options.validate && clean {
            self.cache.insert(&environment, Arc::clone(&config));
        }

        if !clean {
            tracing::warn!(
                environment = %environment,
                errors = ?diagnostics.validation_errors,
                missing = ?diagnostics.missing_env_vars,
                "Configuration loaded with diagnostics"
            );
        }
        tracing::info!(
            environment = %environment,
            validation_errors = diagnostics.validation_errors.len(),
            missing_env_vars = diagnostics.missing_env_vars.len(),
            warnings = diagnostics.warnings.len(),
            "Configuration loaded"
        );

        Ok(LoadResult {
            config,
            environment,
            validation_errors: diagnostics.validation_errors,
            missing_env_vars: diagnostics.missing_env_vars,
            warnings: diagnostics.warnings,
            from_cache: false,
        })
    }

    /// Secret values for every required, defined or mapped variable the
    /// caller did not supply.
    fn resolve_secrets(
        &self,
        profile: &ConfigProfile,
        supplied: &BTreeMap<String, String>,
    ) -> BTreeMap<String, String> {
        let Some(secrets) = self.secrets.as_deref() else {
            return BTreeMap::new();
        };

        let names: BTreeSet<&str> = profile
            .required_env_vars
            .iter()
            .map(String::as_str)
            .chain(profile.definitions.iter().map(|definition| definition.name.as_str()))
            .chain(self.mapper.iter().map(|(name, _)| name))
            .collect();

        let resolved: BTreeMap<String, String> = names
            .into_iter()
            .filter(|name| supplied.get(*name).is_none_or(|value| is_blank(value)))
            .filter_map(|name| lookup_secret(secrets, name).map(|value| (name.to_string(), value)))
            .collect();

        if !resolved.is_empty() {
            tracing::debug!(
                names = ?resolved.keys().collect::<Vec<_>>(),
                "Resolved variables through secret providers"
            );
        }
        resolved
    }

    /// Coerce every mapped or defined variable.
    fn coerce_all(
        &self,
        profile: &ConfigProfile,
        effective: &BTreeMap<String, String>,
        throw_on_error: bool,
        diagnostics: &mut Diagnostics,
    ) -> Result<BTreeMap<String, Value>, ConfigError> {
        let mut coerced = BTreeMap::new();

        for definition in &profile.definitions {
            let raw = effective
                .get(&definition.name)
                .map(String::as_str)
                .filter(|value| !is_blank(value));
            match coerce(definition, raw) {
                Ok(Some(value)) => {
                    coerced.insert(definition.name.clone(), value);
                }
                Ok(None) | Err(ConfigError::MissingRequiredVar(_)) => {}
                Err(e) if definition.required => {
                    if throw_on_error {
                        return Err(e);
                    }
                    diagnostics.validation_errors.push(e.to_string());
                }
                Err(e) => {
                    tracing::warn!(var = %definition.name, error = %e, "Ignoring invalid environment variable");
                    diagnostics.warnings.push(e.to_string());
                }
            }
        }

        for (name, raw) in effective {
            if is_blank(raw) || coerced.contains_key(name) || profile.definition(name).is_some() {
                continue;
            }
            if self.mapper.contains(name) {
                coerced.insert(name.clone(), infer(raw));
            }
        }

        Ok(coerced)
    }

    /// Drop every cached tree.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Drop the cached tree for one environment.
    pub fn invalidate(&self, environment: &str) -> bool {
        self.cache.invalidate(environment)
    }

    pub fn is_cached(&self, environment: &str) -> bool {
        self.cache.contains(environment)
    }
}

/// Required names with no usable value in `effective`, in declaration order.
fn find_missing(profile: &ConfigProfile, effective: &BTreeMap<String, String>) -> Vec<String> {
    let required = profile.required_env_vars.iter().map(String::as_str).chain(
        profile
            .definitions
            .iter()
            .filter(|definition| definition.required)
            .map(|definition| definition.name.as_str()),
    );

    let mut missing: Vec<String> = Vec::new();
    for name in required {
        if missing.iter().any(|m| m == name) {
            continue;
        }
        if effective.get(name).is_some_and(|value| !is_blank(value)) {
            continue;
        }
        missing.push(name.to_string());
    }
    missing
}

fn lookup_secret(secrets: &SecretManager, name: &str) -> Option<String> {
    match secrets.get_secret_value(name) {
        Ok(secret) => Some(secret.expose_secret().to_string()),
        Err(e) => {
            tracing::debug!(var = name, error = %e, "Secret lookup failed");
            None
        }
    }
}
