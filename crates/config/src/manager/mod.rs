//! Configuration lifecycle: load once, read many, reload on demand.
//!
//! Responsibilities:
//! - Own a `ConfigLoader` and publish the current tree for readers.
//! - Apply middleware to every loaded tree and notify watchers of changes.
//! - Serve sections, dotted-path lookups and redacted exports.
//!
//! Does NOT handle:
//! - Building trees from profiles and variables (see `loader`).
//! - Deciding which fields are sensitive (see `redact`).
//!
//! Invariants:
//! - `initialize`, `reload` and `switch_environment` are serialized; watchers of
//!   one load finish before the next load starts.
//! - A failed operation restores the previous state and keeps the previous tree.
//! - Readers always receive deep copies; the published tree is never mutated.
//! - Watchers run without the state lock held, so they may read the manager.

mod export;
mod middleware;
mod watch;

use std::sync::{
    Arc, Mutex, MutexGuard, OnceLock, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard,
};
use std::thread::{self, ThreadId};

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ConfigError;
use crate::loader::{ConfigLoader, LoadOptions, LoadResult};
use crate::redact::SecretRedactor;
use crate::tree::get_path;

pub use export::ExportFormat;
pub use middleware::{FnMiddleware, Middleware, MiddlewareId, middleware_fn};
pub use watch::{ChangeEvent, ConfigChanges, WatcherError, WatcherId};

use middleware::MiddlewarePipeline;
use watch::WatcherRegistry;

/// Lifecycle state of a `ConfigManager`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManagerState {
    Uninitialized,
    Initializing,
    Ready,
    Reloading,
    SwitchingEnvironment,
}

/// Options for `ConfigManager::get_section`.
#[derive(Debug, Clone, Default)]
pub struct SectionOptions {
    /// Re-validate the section against the validator's sub-schema, if any.
    pub validate: bool,
    /// Returned when the section is absent.
    pub default_value: Option<Value>,
}

impl SectionOptions {
    pub fn validated() -> Self {
        Self {
            validate: true,
            default_value: None,
        }
    }

    pub fn with_default(mut self, value: Value) -> Self {
        self.default_value = Some(value);
        self
    }
}

struct Published {
    state: ManagerState,
    config: Option<Arc<Value>>,
    environment: Option<String>,
    options: LoadOptions,
    last_result: Option<LoadResult>,
}

/// Owns the current configuration tree and its lifecycle.
pub struct ConfigManager {
    loader: ConfigLoader,
    redactor: SecretRedactor,
    published: RwLock<Published>,
    middleware: MiddlewarePipeline,
    watchers: WatcherRegistry,
    operation: Mutex<()>,
    operation_owner: Mutex<Option<ThreadId>>,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Held for the duration of one initialize/reload/switch.
struct OperationGuard<'a> {
    _operation: MutexGuard<'a, ()>,
    owner: &'a Mutex<Option<ThreadId>>,
}

impl Drop for OperationGuard<'_> {
    fn drop(&mut self) {
        *lock(self.owner) = None;
    }
}

pub(crate) fn read_lock<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) fn write_lock<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ConfigManager {
    /// Manager over the built-in profiles and application schema.
    pub fn new() -> Self {
        Self::with_loader(ConfigLoader::new())
    }

    pub fn with_loader(loader: ConfigLoader) -> Self {
        Self {
            loader,
            redactor: SecretRedactor::default(),
            published: RwLock::new(Published {
                state: ManagerState::Uninitialized,
                config: None,
                environment: None,
                options: LoadOptions::default(),
                last_result: None,
            }),
            middleware: MiddlewarePipeline::default(),
            watchers: WatcherRegistry::default(),
            operation: Mutex::new(()),
            operation_owner: Mutex::new(None),
        }
    }

    pub fn with_redactor(mut self, redactor: SecretRedactor) -> Self {
        self.redactor = redactor;
        self
    }

    /// Process-wide manager, constructed on first use.
    pub fn global() -> &'static ConfigManager {
        static GLOBAL: OnceLock<ConfigManager> = OnceLock::new();
        GLOBAL.get_or_init(ConfigManager::new)
    }

    pub fn loader(&self) -> &ConfigLoader {
        &self.loader
    }

    pub fn state(&self) -> ManagerState {
        read_lock(&self.published).state
    }

    pub fn is_ready(&self) -> bool {
        self.state() == ManagerState::Ready
    }

    /// Environment of the published tree.
    pub fn environment(&self) -> Option<String> {
        read_lock(&self.published).environment.clone()
    }

    /// Diagnostics of the last successful load.
    pub fn last_diagnostics(&self) -> Option<LoadResult> {
        read_lock(&self.published).last_result.clone()
    }

    /// Load, transform and publish configuration, then notify watchers.
    ///
    /// # Errors
    ///
    /// Any loader error, `MiddlewareFailed`, or `ReentrantOperation` when called
    /// from inside a watcher or middleware.
    pub fn initialize(&self, options: LoadOptions) -> Result<Value, ConfigError> {
        let _guard = self.begin_operation()?;
        let transitional = match self.state() {
            ManagerState::Uninitialized => ManagerState::Initializing,
            _ => ManagerState::Reloading,
        };
        self.run(options, transitional)
    }

    /// Reload with the options of the last load, layered under `options` if given.
    ///
    /// The published environment is kept unless `options` names another one.
    pub fn reload(&self, options: Option<LoadOptions>) -> Result<Value, ConfigError> {
        let _guard = self.begin_operation()?;
        let remembered = read_lock(&self.published).options.clone();
        let options = match options {
            Some(options) => options.layered_over(&remembered),
            None => remembered,
        };
        self.loader.clear_cache();
        self.run(options, ManagerState::Reloading)
    }

    /// Load and publish `environment` in place of the current one.
    pub fn switch_environment(
        &self,
        environment: &str,
        options: Option<LoadOptions>,
    ) -> Result<Value, ConfigError> {
        let _guard = self.begin_operation()?;
        let mut options = options.unwrap_or_else(|| read_lock(&self.published).options.clone());
        options.environment = Some(environment.to_string());
        self.loader.clear_cache();
        tracing::info!(environment, "Switching configuration environment");
        self.run(options, ManagerState::SwitchingEnvironment)
    }

    fn begin_operation(&self) -> Result<OperationGuard<'_>, ConfigError> {
        let current = thread::current().id();
        if *lock(&self.operation_owner) == Some(current) {
            return Err(ConfigError::ReentrantOperation);
        }
        let operation = lock(&self.operation);
        *lock(&self.operation_owner) = Some(current);
        Ok(OperationGuard {
            _operation: operation,
            owner: &self.operation_owner,
        })
    }

    fn run(&self, options: LoadOptions, transitional: ManagerState) -> Result<Value, ConfigError> {
        let previous_state = {
            let mut published = write_lock(&self.published);
            let previous = published.state;
            published.state = transitional;
            previous
        };

        match self.load_and_transform(&options) {
            Ok((result, config)) => {
                let environment = result.environment.clone();
                let old_config = {
                    let mut published = write_lock(&self.published);
                    let old = published.config.replace(Arc::clone(&config));
                    published.environment = Some(environment.clone());
                    published.options = LoadOptions {
                        environment: Some(environment.clone()),
                        ..options
                    };
                    published.last_result = Some(result);
                    published.state = ManagerState::Ready;
                    old
                };

                let event = ChangeEvent {
                    changes: ConfigChanges::between(old_config.as_deref(), &config),
                    environment,
                    old_config,
                    new_config: Arc::clone(&config),
                    timestamp: chrono::Utc::now(),
                };
                let failures = self.watchers.notify(&event);
                tracing::debug!(
                    environment = %event.environment,
                    changed = event.changes.is_changed(),
                    watcher_failures = failures,
                    "Configuration published"
                );

                Ok((*config).clone())
            }
            Err(e) => {
                write_lock(&self.published).state = previous_state;
                tracing::warn!(error = %e, "Configuration load failed, keeping previous state");
                Err(e)
            }
        }
    }

    fn load_and_transform(
        &self,
        options: &LoadOptions,
    ) -> Result<(LoadResult, Arc<Value>), ConfigError> {
        let result = self.loader.load(options)?;
        if self.middleware.is_empty() {
            let config = Arc::clone(&result.config);
            return Ok((result, config));
        }
        let transformed = self
            .middleware
            .apply((*result.config).clone(), &result.environment)?;
        Ok((result, Arc::new(transformed)))
    }

    fn current(&self) -> Result<Arc<Value>, ConfigError> {
        read_lock(&self.published)
            .config
            .clone()
            .ok_or(ConfigError::NotInitialized)
    }

    /// Deep copy of the published tree.
    pub fn get_config(&self) -> Result<Value, ConfigError> {
        Ok((*self.current()?).clone())
    }

    /// Deep copy of one top-level section.
    ///
    /// # Errors
    ///
    /// `SectionNotFound` when absent without a default; `SectionValidationFailed`
    /// when `validate` is set and the section fails its sub-schema.
    pub fn get_section(&self, name: &str, options: SectionOptions) -> Result<Value, ConfigError> {
        let config = self.current()?;
        let value = match (config.get(name), options.default_value) {
            (Some(value), _) => value.clone(),
            (None, Some(default)) => return Ok(default),
            (None, None) => return Err(ConfigError::SectionNotFound(name.to_string())),
        };

        if !options.validate {
            return Ok(value);
        }

        match self.loader.validator().validate_section(name, &value) {
            Some(outcome) if outcome.valid => Ok(outcome.data.unwrap_or(value)),
            Some(outcome) => Err(ConfigError::SectionValidationFailed {
                section: name.to_string(),
                errors: outcome.errors,
            }),
            None => {
                tracing::debug!(section = name, "No sub-schema declared, section not re-validated");
                Ok(value)
            }
        }
    }

    /// Deserialize one top-level section into `T`.
    pub fn section<T: DeserializeOwned>(&self, name: &str) -> Result<T, ConfigError> {
        let value = self.get_section(name, SectionOptions::default())?;
        serde_json::from_value(value).map_err(|source| ConfigError::SectionDeserialize {
            section: name.to_string(),
            source,
        })
    }

    /// Value at a dotted path, if initialized and present.
    pub fn get(&self, path: &str) -> Option<Value> {
        let config = self.current().ok()?;
        get_path(&config, path).cloned()
    }

    /// Value at a dotted path, or `default`. Never fails.
    pub fn get_or(&self, path: &str, default: Value) -> Value {
        self.get(path).unwrap_or(default)
    }

    /// Value at a dotted path deserialized into `T`; `None` if absent or mistyped.
    pub fn get_as<T: DeserializeOwned>(&self, path: &str) -> Option<T> {
        self.get(path)
            .and_then(|value| serde_json::from_value(value).ok())
    }

    /// Register middleware; it runs on every subsequent load, in order.
    pub fn use_middleware<F>(&self, name: impl Into<String>, apply: F) -> MiddlewareId
    where
        F: Fn(Value, &str) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        self.add_middleware(middleware_fn(name, apply))
    }

    pub fn add_middleware<M: Middleware + 'static>(&self, middleware: M) -> MiddlewareId {
        self.middleware.add(Arc::new(middleware))
    }

    pub fn remove_middleware(&self, id: MiddlewareId) -> bool {
        self.middleware.remove(id)
    }

    /// Register a watcher, called after every successful load.
    ///
    /// Watchers must not call `initialize`, `reload` or `switch_environment`;
    /// such calls fail with `ReentrantOperation`.
    pub fn watch<F>(&self, watcher: F) -> WatcherId
    where
        F: Fn(&ChangeEvent) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.watchers.add(Arc::new(watcher))
    }

    pub fn unwatch(&self, id: WatcherId) -> bool {
        self.watchers.remove(id)
    }

    /// Register a handler for watcher failures.
    pub fn on_watcher_error<F>(&self, handler: F)
    where
        F: Fn(&WatcherError) + Send + Sync + 'static,
    {
        self.watchers.add_error_handler(Arc::new(handler));
    }

    /// Redacted rendering of the published tree.
    pub fn export(&self, format: ExportFormat) -> Result<String, ConfigError> {
        let config = self.current()?;
        let redacted = self.redactor.redact(&config);
        export::render(&redacted, format, self.loader.path_mapper())
    }

    /// Redacted deep copy of the published tree.
    pub fn redacted_config(&self) -> Result<Value, ConfigError> {
        Ok(self.redactor.redact(&*self.current()?))
    }
}
