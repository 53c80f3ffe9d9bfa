//! Shared router state.
//!
//! Configured once during startup (`set_project`, `add_backend`), then
//! frozen behind an `Arc` and read by every request without locking.

use std::sync::Arc;

use crate::config::ConfigError;
use crate::content::ContentKeys;
use crate::routing::{BackendRule, BackendTable};
use crate::store::ContentStore;

pub struct RouterState {
    keys: ContentKeys,
    backends: BackendTable,
    store: Arc<dyn ContentStore>,
}

impl RouterState {
    /// Empty state on the default project with no backend rules.
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self {
            keys: ContentKeys::default(),
            backends: BackendTable::new(),
            store,
        }
    }

    /// Change the project; the base content key follows.
    pub fn set_project(&mut self, project: impl Into<String>) {
        self.keys.set_project(project);
    }

    /// Register a `prefix:host` backend after the existing ones.
    pub fn add_backend(&mut self, spec: &str) -> Result<&BackendRule, ConfigError> {
        self.backends.add_backend(spec)
    }

    pub fn keys(&self) -> &ContentKeys {
        &self.keys
    }

    pub fn backends(&self) -> &BackendTable {
        &self.backends
    }

    pub fn store(&self) -> &dyn ContentStore {
        self.store.as_ref()
    }
}

impl std::fmt::Debug for RouterState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouterState")
            .field("keys", &self.keys)
            .field("backends", &self.backends.len())
            .finish_non_exhaustive()
    }
}
