//! Application state.

use std::sync::Arc;

use tributary_git::{Registry, SyncStatus};

/// Application state shared across all handlers.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// Status of every mirrored repository, in configuration order.
    statuses: Arc<Vec<Arc<SyncStatus>>>,
}

impl AppState {
    /// Creates a new AppState over the given repository statuses.
    pub fn new(statuses: Vec<Arc<SyncStatus>>) -> Self {
        Self {
            statuses: Arc::new(statuses),
        }
    }

    /// Creates an AppState from a running registry.
    pub fn from_registry(registry: &Registry) -> Self {
        Self::new(registry.statuses())
    }

    /// Returns the status of every repository.
    pub fn statuses(&self) -> &[Arc<SyncStatus>] {
        &self.statuses
    }

    /// Finds a repository's status by name.
    pub fn status(&self, name: &str) -> Option<&Arc<SyncStatus>> {
        self.statuses.iter().find(|status| status.name() == name)
    }
}
