//! Multi-provider secret retrieval.
//!
//! Responsibilities:
//! - Define the `SecretProvider` seam.
//! - Query providers in priority order and cache the first hit.
//!
//! Does NOT handle:
//! - Deciding which variables need a secret (see `loader`).
//! - Redacting secrets from trees (see `redact`).
//!
//! Invariants:
//! - Secret values are only held as `SecretString` and never logged.
//! - A provider failure does not stop lower-priority providers from being tried.
//! - Cached values expire after the configured TTL.

mod providers;

use std::sync::Arc;
use std::time::Duration;

use moka::sync::Cache;
use secrecy::SecretString;
use thiserror::Error;

use crate::constants::{DEFAULT_SECRET_CACHE_CAPACITY, DEFAULT_SECRET_CACHE_TTL};

pub use providers::{EnvSecretProvider, FileSecretProvider, KeyringSecretProvider, StaticSecretProvider};

/// Errors from secret retrieval.
#[derive(Error, Debug)]
pub enum SecretError {
    #[error("Secret '{name}' not found (tried: {})", .tried.join(", "))]
    NotFound { name: String, tried: Vec<String> },

    #[error("Secret provider '{provider}' failed: {message}")]
    Provider { provider: String, message: String },

    #[error("Keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A backend that can look up secrets by name.
pub trait SecretProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Look up `key`; `Ok(None)` means this provider does not have it.
    fn get_secret(&self, key: &str) -> Result<Option<SecretString>, SecretError>;
}

/// Queries providers in order and caches resolved secrets.
pub struct SecretManager {
    providers: Vec<Arc<dyn SecretProvider>>,
    cache: Cache<String, SecretString>,
}

impl Default for SecretManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SecretManager {
    pub fn new() -> Self {
        Self::with_cache_ttl(DEFAULT_SECRET_CACHE_TTL)
    }

    pub fn with_cache_ttl(ttl: Duration) -> Self {
        Self {
            providers: Vec::new(),
            cache: Cache::builder()
                .max_capacity(DEFAULT_SECRET_CACHE_CAPACITY)
                .time_to_live(ttl)
                .build(),
        }
    }

    /// Append a provider; earlier providers take priority.
    pub fn with_provider<P: SecretProvider + 'static>(mut self, provider: P) -> Self {
        self.providers.push(Arc::new(provider));
        self
    }

    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Resolve a secret, consulting the cache first.
    pub fn get_secret_value(&self, name: &str) -> Result<SecretString, SecretError> {
        if let Some(cached) = self.cache.get(name) {
            tracing::trace!(secret = %name, "Secret cache hit");
            return Ok(cached);
        }

        let mut tried = Vec::with_capacity(self.providers.len());
        for provider in &self.providers {
            tried.push(provider.name().to_string());
            match provider.get_secret(name) {
                Ok(Some(secret)) => {
                    tracing::debug!(secret = %name, provider = %provider.name(), "Resolved secret");
                    self.cache.insert(name.to_string(), secret.clone());
                    return Ok(secret);
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(
                        secret = %name,
                        provider = %provider.name(),
                        error = %e,
                        "Secret provider failed, trying next provider"
                    );
                }
            }
        }

        Err(SecretError::NotFound {
            name: name.to_string(),
            tried,
        })
    }

    pub fn invalidate(&self, name: &str) {
        self.cache.invalidate(name);
    }

    pub fn clear_cache(&self) {
        self.cache.invalidate_all();
    }
}
