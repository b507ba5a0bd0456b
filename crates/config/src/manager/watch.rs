//! Change events and isolated watcher notification.
//!
//! Invariants:
//! - Watchers are called synchronously, in registration order.
//! - A watcher that returns an error or panics never stops later watchers;
//!   the failure is logged and passed to every watcher-error handler.

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::{read_lock, write_lock};
use crate::tree::{ConfigChange, diff};

/// Handle returned by `ConfigManager::watch`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WatcherId(u64);

impl WatcherId {
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

/// What changed between the previous and the new tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigChanges {
    /// No tree was published before.
    InitialLoad,
    Unchanged,
    /// Changed leaves, sorted by path.
    Changed(Vec<ConfigChange>),
}

impl ConfigChanges {
    pub fn between(old: Option<&Value>, new: &Value) -> Self {
        match old {
            None => ConfigChanges::InitialLoad,
            Some(old) => {
                let changes = diff(old, new);
                if changes.is_empty() {
                    ConfigChanges::Unchanged
                } else {
                    ConfigChanges::Changed(changes)
                }
            }
        }
    }

    pub fn is_changed(&self) -> bool {
        !matches!(self, ConfigChanges::Unchanged)
    }
}

/// Delivered to watchers after every successful initialize, reload or switch.
#[derive(Debug, Clone)]
pub struct ChangeEvent {
    pub environment: String,
    pub old_config: Option<Arc<Value>>,
    pub new_config: Arc<Value>,
    pub changes: ConfigChanges,
    pub timestamp: DateTime<Utc>,
}

/// A watcher that failed while handling a `ChangeEvent`.
#[derive(Debug, Clone)]
pub struct WatcherError {
    pub watcher: WatcherId,
    pub message: String,
    pub panicked: bool,
}

type Watcher = Arc<dyn Fn(&ChangeEvent) -> anyhow::Result<()> + Send + Sync>;
type ErrorHandler = Arc<dyn Fn(&WatcherError) + Send + Sync>;

#[derive(Default)]
pub(crate) struct WatcherRegistry {
    watchers: RwLock<Vec<(WatcherId, Watcher)>>,
    error_handlers: RwLock<Vec<ErrorHandler>>,
    next_id: AtomicU64,
}

impl WatcherRegistry {
    pub(crate) fn add(&self, watcher: Watcher) -> WatcherId {
        let id = WatcherId(self.next_id.fetch_add(1, Ordering::Relaxed));
        write_lock(&self.watchers).push((id, watcher));
        id
    }

    pub(crate) fn remove(&self, id: WatcherId) -> bool {
        let mut watchers = write_lock(&self.watchers);
        let before = watchers.len();
        watchers.retain(|(existing, _)| *existing != id);
        watchers.len() != before
    }

    pub(crate) fn add_error_handler(&self, handler: ErrorHandler) {
        write_lock(&self.error_handlers).push(handler);
    }

    /// Notify every watcher; returns the number that failed.
    pub(crate) fn notify(&self, event: &ChangeEvent) -> usize {
        let watchers: Vec<(WatcherId, Watcher)> = read_lock(&self.watchers).clone();
        let mut failures = 0;

        for (id, watcher) in watchers {
            let error = match catch_unwind(AssertUnwindSafe(|| watcher(event))) {
                Ok(Ok(())) => continue,
                Ok(Err(e)) => WatcherError {
                    watcher: id,
                    message: format!("{e:#}"),
                    panicked: false,
                },
                Err(payload) => WatcherError {
                    watcher: id,
                    message: panic_message(payload.as_ref()),
                    panicked: true,
                },
            };

            failures += 1;
            tracing::warn!(
                watcher = id.0,
                panicked = error.panicked,
                error = %error.message,
                "Configuration watcher failed"
            );
            self.report(&error);
        }
        failures
    }

    fn report(&self, error: &WatcherError) {
        let handlers: Vec<ErrorHandler> = read_lock(&self.error_handlers).clone();
        for handler in handlers {
            if catch_unwind(AssertUnwindSafe(|| handler(error))).is_err() {
                tracing::warn!(watcher = error.watcher.0, "Watcher error handler panicked");
            }
        }
    }
}

pub(super) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_changes_between_trees() {
        let old = json!({"app": {"port": 3000}});
        assert_eq!(ConfigChanges::between(None, &old), ConfigChanges::InitialLoad);
        assert_eq!(ConfigChanges::between(Some(&old), &old), ConfigChanges::Unchanged);

        let new = json!({"app": {"port": 4000}});
        match ConfigChanges::between(Some(&old), &new) {
            ConfigChanges::Changed(changes) => {
                assert_eq!(changes.len(), 1);
                assert_eq!(changes[0].path, "app.port");
            }
            other => panic!("expected changes, got {other:?}"),
        }
    }

    fn panic_static() {
        panic!("boom")
    }

    fn panic_formatted(code: u32) {
        panic!("code {code}")
    }

    #[test]
    fn test_panic_message_extraction() {
        let payload = catch_unwind(panic_static).unwrap_err();
        assert_eq!(panic_message(payload.as_ref()), "boom");

        let payload = catch_unwind(|| panic_formatted(7)).unwrap_err();
        assert_eq!(panic_message(payload.as_ref()), "code 7");
    }
}
