//! Runtime binding of a repository configuration to its working copy.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};
use tributary_core::RepositoryConfig;

use crate::backend::VcsBackend;
use crate::error::SyncError;
use crate::sync::{BranchFailure, BranchSync, PollReport, pull};

/// A mirrored repository and its (possibly not yet cloned) working copy.
///
/// The handle is owned by exactly one scheduler task; every method takes
/// `&mut self`, so two syncs can never run against the same working copy.
pub struct RepositoryHandle<B: VcsBackend> {
    backend: Arc<B>,
    config: Arc<RepositoryConfig>,
    store: PathBuf,
    copy: Option<B::Copy>,
}

impl<B: VcsBackend> RepositoryHandle<B> {
    /// Creates a handle, opening the working copy at `store` if it exists.
    ///
    /// A missing working copy is expected on first run and is not an error;
    /// it is cloned by the first poll.
    pub fn open(backend: Arc<B>, config: Arc<RepositoryConfig>, store: PathBuf) -> Self {
        let copy = match backend.open(&config, &store) {
            Ok(Some(copy)) => Some(copy),
            Ok(None) => {
                debug!("Repository {} not found at {:?}", config.name(), store);
                None
            },
            Err(e) => {
                warn!("Cannot open repository {}: {}", config.name(), e);
                None
            },
        };

        Self {
            backend,
            config,
            store,
            copy,
        }
    }

    /// Returns a handle for the same repository without an opened copy.
    ///
    /// Used to recover when the owning copy was lost with a panicked task.
    pub fn detached(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            config: Arc::clone(&self.config),
            store: self.store.clone(),
            copy: None,
        }
    }

    /// Returns the repository name.
    pub fn name(&self) -> &str {
        self.config.name()
    }

    /// Returns the repository configuration.
    pub fn config(&self) -> &RepositoryConfig {
        &self.config
    }

    /// Returns the working copy path.
    pub fn store(&self) -> &Path {
        &self.store
    }

    /// Returns true if a working copy is open.
    pub fn is_open(&self) -> bool {
        self.copy.is_some()
    }

    /// Synchronizes the repository once.
    ///
    /// Clones when the store path does not exist yet, otherwise pulls every
    /// configured branch in order. A failing branch is logged and reported but
    /// does not stop the remaining ones.
    pub fn poll(&mut self) -> Result<PollReport, SyncError> {
        if !self.store.exists() {
            self.clone_fresh()?;
            return Ok(PollReport::Cloned);
        }

        let name = self.config.name().to_string();
        let mut synced = Vec::new();
        let mut failed = Vec::new();

        for branch in self.config.branches().to_vec() {
            match self.pull(&branch) {
                Ok(result) => synced.push(result),
                Err(error) => {
                    warn!(
                        repository = %name,
                        branch = %branch,
                        "Pull failed: {}",
                        error
                    );
                    failed.push(BranchFailure { branch, error });
                },
            }
        }

        Ok(PollReport::Pulled { synced, failed })
    }

    /// Pulls one branch, opening the working copy first if needed.
    pub fn pull(&mut self, branch: &str) -> Result<BranchSync, SyncError> {
        let copy = match self.copy.take() {
            Some(copy) => copy,
            None => self
                .backend
                .open(&self.config, &self.store)?
                .ok_or_else(|| SyncError::Open {
                    path: self.store.clone(),
                    reason: "not a git repository".to_string(),
                })?,
        };
        let copy = self.copy.insert(copy);

        pull(copy, self.config.name(), branch)
    }

    fn clone_fresh(&mut self) -> Result<(), SyncError> {
        info!(
            "Repository {} not cached, cloning to {:?}",
            self.config.name(),
            self.store
        );

        std::fs::create_dir_all(&self.store).map_err(|source| SyncError::DirectoryCreation {
            path: self.store.clone(),
            source,
        })?;

        match self.backend.clone_repository(&self.config, &self.store) {
            Ok(copy) => {
                self.copy = Some(copy);
                info!("Repository {} cloned successfully", self.config.name());
                Ok(())
            },
            Err(e) => {
                // Leave no half-cloned store behind so the next tick clones again.
                if let Err(remove_err) = std::fs::remove_dir_all(&self.store) {
                    warn!(
                        "Failed to remove {:?} after failed clone: {}",
                        self.store, remove_err
                    );
                }
                self.copy = None;
                Err(e)
            },
        }
    }
}

impl<B: VcsBackend> std::fmt::Debug for RepositoryHandle<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RepositoryHandle")
            .field("name", &self.config.name())
            .field("url", &self.config.url())
            .field("store", &self.store)
            .field("open", &self.copy.is_some())
            .finish()
    }
}
