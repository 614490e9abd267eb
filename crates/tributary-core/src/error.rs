//! Error types for mirror configuration.
//!
//! Configuration is validated once, when it is loaded, so that the
//! synchronization engine can rely on its invariants (non-empty branch
//! lists, unique repository names) without re-checking them on every tick.
//!
//! # Example
//!
//! ```
//! use tributary_core::{ConfigError, RepositoryConfig};
//!
//! let result = RepositoryConfig::builder()
//!     .name("app-config")
//!     .url("https://git.example.com/org/app-config.git")
//!     .build();
//!
//! assert!(matches!(result, Err(ConfigError::NoBranches { .. })));
//! ```

use thiserror::Error;

/// Errors raised while building or validating a mirror configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The configuration does not declare any repository.
    #[error("no repositories configured")]
    NoRepositories,

    /// A required field is missing.
    #[error("missing required field '{field}'")]
    MissingField {
        /// Name of the missing field
        field: &'static str,
    },

    /// A repository name is empty or cannot be used as a directory name.
    #[error("invalid repository name '{name}': {reason}")]
    InvalidRepositoryName {
        /// The offending name
        name: String,
        /// Why it was rejected
        reason: &'static str,
    },

    /// Two repositories share the same name, and therefore the same store path.
    #[error("duplicate repository name '{0}'")]
    DuplicateRepository(String),

    /// A repository has an empty remote URL.
    #[error("repository '{repository}' has an empty url")]
    EmptyUrl {
        /// Repository name
        repository: String,
    },

    /// A repository does not track any branch.
    #[error("repository '{repository}' does not track any branch")]
    NoBranches {
        /// Repository name
        repository: String,
    },

    /// A branch name cannot be turned into a valid Git reference.
    #[error("repository '{repository}': invalid branch '{branch}': {reason}")]
    InvalidBranch {
        /// Repository name
        repository: String,
        /// The offending branch name
        branch: String,
        /// Why it was rejected
        reason: &'static str,
    },

    /// The same branch is listed twice for one repository.
    #[error("repository '{repository}' lists branch '{branch}' more than once")]
    DuplicateBranch {
        /// Repository name
        repository: String,
        /// The repeated branch
        branch: String,
    },
}

impl ConfigError {
    /// Creates an invalid branch error.
    pub fn invalid_branch(
        repository: impl Into<String>,
        branch: impl Into<String>,
        reason: &'static str,
    ) -> Self {
        Self::InvalidBranch {
            repository: repository.into(),
            branch: branch.into(),
            reason,
        }
    }

    /// Creates an invalid repository name error.
    pub fn invalid_name(name: impl Into<String>, reason: &'static str) -> Self {
        Self::InvalidRepositoryName {
            name: name.into(),
            reason,
        }
    }
}

/// Convenience alias for configuration results.
pub type Result<T> = std::result::Result<T, ConfigError>;
