//! Per-environment cache of loaded trees.
//!
//! Invariants:
//! - At most one tree per environment.
//! - Entries never expire; they are removed only by `invalidate` or `clear`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::Value;

#[derive(Debug, Default)]
pub(crate) struct ConfigCache {
    entries: Mutex<HashMap<String, Arc<Value>>>,
}

impl ConfigCache {
    fn entries(&self) -> MutexGuard<'_, HashMap<String, Arc<Value>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn get(&self, environment: &str) -> Option<Arc<Value>> {
        self.entries().get(environment).cloned()
    }

    pub(crate) fn insert(&self, environment: &str, config: Arc<Value>) {
        self.entries().insert(environment.to_string(), config);
    }

    pub(crate) fn contains(&self, environment: &str) -> bool {
        self.entries().contains_key(environment)
    }

    pub(crate) fn invalidate(&self, environment: &str) -> bool {
        self.entries().remove(environment).is_some()
    }

    pub(crate) fn clear(&self) {
        self.entries().clear();
    }
}
