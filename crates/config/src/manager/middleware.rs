//! Ordered transformation pipeline applied to every loaded tree.
//!
//! Invariants:
//! - Middleware runs in registration order.
//! - The first failure aborts the pipeline; later middleware does not run.
//! - A panicking middleware is reported as a failure, not propagated.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use serde_json::Value;

use super::watch::panic_message;
use super::{read_lock, write_lock};
use crate::error::ConfigError;

/// Handle returned by `ConfigManager::use_middleware`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MiddlewareId(u64);

/// A named transformation over a freshly loaded tree.
pub trait Middleware: Send + Sync {
    fn name(&self) -> &str;

    /// Transform `config` for `environment`.
    fn apply(&self, config: Value, environment: &str) -> anyhow::Result<Value>;
}

/// Closure-backed middleware, built by `middleware_fn`.
pub struct FnMiddleware<F> {
    name: String,
    apply: F,
}

impl<F> Middleware for FnMiddleware<F>
where
    F: Fn(Value, &str) -> anyhow::Result<Value> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, config: Value, environment: &str) -> anyhow::Result<Value> {
        (self.apply)(config, environment)
    }
}

/// Wrap a closure as named middleware.
pub fn middleware_fn<F>(name: impl Into<String>, apply: F) -> FnMiddleware<F>
where
    F: Fn(Value, &str) -> anyhow::Result<Value> + Send + Sync,
{
    FnMiddleware {
        name: name.into(),
        apply,
    }
}

#[derive(Default)]
pub(crate) struct MiddlewarePipeline {
    entries: RwLock<Vec<(MiddlewareId, Arc<dyn Middleware>)>>,
    next_id: AtomicU64,
}

impl MiddlewarePipeline {
    pub(crate) fn add(&self, middleware: Arc<dyn Middleware>) -> MiddlewareId {
        let id = MiddlewareId(self.next_id.fetch_add(1, Ordering::Relaxed));
        write_lock(&self.entries).push((id, middleware));
        id
    }

    pub(crate) fn remove(&self, id: MiddlewareId) -> bool {
        let mut entries = write_lock(&self.entries);
        let before = entries.len();
        entries.retain(|(existing, _)| *existing != id);
        entries.len() != before
    }

    pub(crate) fn is_empty(&self) -> bool {
        read_lock(&self.entries).is_empty()
    }

    /// Run every registered middleware over `config`.
    pub(crate) fn apply(&self, mut config: Value, environment: &str) -> Result<Value, ConfigError> {
        let snapshot: Vec<Arc<dyn Middleware>> = read_lock(&self.entries)
            .iter()
            .map(|(_, middleware)| Arc::clone(middleware))
            .collect();

        for middleware in snapshot {
            let outcome = catch_unwind(AssertUnwindSafe(|| middleware.apply(config, environment)))
                .unwrap_or_else(|payload| {
                    Err(anyhow::anyhow!(
                        "middleware panicked: {}",
                        panic_message(payload.as_ref())
                    ))
                });
            config = outcome.map_err(|source| ConfigError::MiddlewareFailed {
                middleware: middleware.name().to_string(),
                source,
            })?;
            tracing::debug!(middleware = middleware.name(), "Applied configuration middleware");
        }
        Ok(config)
    }
}
