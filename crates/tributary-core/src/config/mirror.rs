//! Top-level mirror configuration.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::RepositoryConfig;
use crate::error::{ConfigError, Result};

/// The set of repositories to mirror and where to keep them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MirrorConfig {
    /// Root directory holding one working copy per repository.
    pub local_store: PathBuf,

    /// Mirrored repositories.
    #[serde(default)]
    pub repos: Vec<RepositoryConfig>,
}

impl MirrorConfig {
    /// Creates a configuration rooted at `local_store`.
    pub fn new(local_store: impl Into<PathBuf>, repos: Vec<RepositoryConfig>) -> Self {
        Self {
            local_store: local_store.into(),
            repos,
        }
    }

    /// Returns the working copy path for a repository.
    pub fn store_path(&self, repository: &RepositoryConfig) -> PathBuf {
        self.local_store.join(repository.name())
    }

    /// Returns the local store root.
    pub fn local_store(&self) -> &Path {
        &self.local_store
    }

    /// Finds a repository by name.
    pub fn repository(&self, name: &str) -> Option<&RepositoryConfig> {
        self.repos.iter().find(|repo| repo.name() == name)
    }

    /// Validates every repository and checks that names are unique.
    pub fn validate(&self) -> Result<()> {
        if self.repos.is_empty() {
            return Err(ConfigError::NoRepositories);
        }

        let mut names = HashSet::new();
        for repo in &self.repos {
            repo.validate()?;

            if !names.insert(repo.name()) {
                return Err(ConfigError::DuplicateRepository(repo.name().to_string()));
            }
        }

        Ok(())
    }
}
