//! Error types for repository synchronization.

use std::path::PathBuf;

/// Errors that can occur while synchronizing a mirrored repository.
///
/// Every variant is terminal for the attempt that raised it. Nothing is
/// retried inside a poll; the next scheduler tick is the retry boundary.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// The local store directory could not be created.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The initial clone failed.
    #[error("clone of {url} failed: {reason}")]
    Clone { url: String, reason: String },

    /// An existing working copy could not be opened.
    #[error("failed to open repository at {path}: {reason}")]
    Open { path: PathBuf, reason: String },

    /// The named remote is not configured on the working copy.
    #[error("remote not found: {0}")]
    RemoteNotFound(String),

    /// Fetching from the remote failed.
    #[error("fetch of {refspec} failed: {reason}")]
    Fetch { refspec: String, reason: String },

    /// HEAD could not be redirected to the branch.
    #[error("failed to set HEAD to {refname}: {reason}")]
    HeadUpdate { refname: String, reason: String },

    /// Checking out HEAD failed.
    #[error("checkout failed: {0}")]
    Checkout(String),

    /// The fetch did not produce the remote-tracking reference.
    #[error("remote-tracking reference not found: {0}")]
    RemoteRefNotFound(String),

    /// A reference could not be looked up or created.
    #[error("failed to resolve {refname}: {reason}")]
    RefResolution { refname: String, reason: String },

    /// A reference could not be moved to its new target.
    #[error("failed to update {refname}: {reason}")]
    RefUpdate { refname: String, reason: String },

    /// Merge analysis failed.
    #[error("merge analysis failed: {0}")]
    MergeAnalysis(String),

    /// Applying the merge failed.
    #[error("merge failed: {0}")]
    MergeApply(String),

    /// The merge left conflicts that this tool does not resolve.
    #[error("merging {branch} produced conflicts")]
    MergeConflict { branch: String },

    /// Merge analysis returned a case this tool does not handle.
    #[error("unsupported merge analysis for {branch}: {analysis}")]
    UnsupportedMerge { branch: String, analysis: String },

    /// Cleaning up merge state failed.
    #[error("failed to clean up repository state: {0}")]
    Cleanup(String),

    /// A branch name cannot be used as a reference.
    #[error("invalid branch '{branch}': {reason}")]
    InvalidBranch { branch: String, reason: &'static str },

    /// A blocking sync task failed to complete.
    #[error("sync task failed: {0}")]
    Task(String),
}

impl SyncError {
    /// Creates a new fetch error.
    pub fn fetch(refspec: impl Into<String>, reason: impl ToString) -> Self {
        Self::Fetch {
            refspec: refspec.into(),
            reason: reason.to_string(),
        }
    }

    /// Creates a new reference resolution error.
    pub fn ref_resolution(refname: impl Into<String>, reason: impl ToString) -> Self {
        Self::RefResolution {
            refname: refname.into(),
            reason: reason.to_string(),
        }
    }

    /// Creates a new reference update error.
    pub fn ref_update(refname: impl Into<String>, reason: impl ToString) -> Self {
        Self::RefUpdate {
            refname: refname.into(),
            reason: reason.to_string(),
        }
    }

    /// Creates a new task error.
    pub fn task(reason: impl ToString) -> Self {
        Self::Task(reason.to_string())
    }

    /// Returns true if this is a transient error that might succeed on retry.
    ///
    /// Only used to pick a log level; every error is retried on the next tick.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Fetch { .. } | Self::Clone { .. } | Self::Task(_)
        )
    }
}
