//! Version-control backend abstraction.
//!
//! The synchronization engine only orchestrates Git primitives. Those
//! primitives are provided by a [`VcsBackend`] that opens or clones working
//! copies, and by the [`WorkingCopy`] it hands out. The production
//! implementation is [`Git2Backend`], backed by libgit2.

mod libgit2;
#[cfg(test)]
pub(crate) mod mock;

use std::fmt;
use std::path::Path;

pub use git2::Oid;
pub use libgit2::{Git2Backend, Git2WorkingCopy};
use tributary_core::RepositoryConfig;

use crate::error::SyncError;

/// Opens and clones working copies.
///
/// # Implementors
///
/// - `Git2Backend` - libgit2 working copies on the local filesystem
pub trait VcsBackend: Send + Sync + 'static {
    /// The working copy type handed out by this backend.
    type Copy: WorkingCopy;

    /// Opens the working copy at `path`.
    ///
    /// Returns `Ok(None)` when there is no repository there yet.
    fn open(
        &self,
        repository: &RepositoryConfig,
        path: &Path,
    ) -> Result<Option<Self::Copy>, SyncError>;

    /// Clones the repository's remote into `path`, which must exist and be empty.
    fn clone_repository(
        &self,
        repository: &RepositoryConfig,
        path: &Path,
    ) -> Result<Self::Copy, SyncError>;
}

/// Primitives the sync procedure needs from an opened working copy.
///
/// References are addressed by their full name (`refs/heads/main`).
pub trait WorkingCopy: Send + 'static {
    /// Fails with [`SyncError::RemoteNotFound`] if the remote is not configured.
    fn find_remote(&self, name: &str) -> Result<(), SyncError>;

    /// Fetches the given refspecs from a remote.
    fn fetch(&mut self, remote: &str, refspecs: &[&str]) -> Result<(), SyncError>;

    /// Points HEAD at a reference.
    fn set_head(&mut self, refname: &str) -> Result<(), SyncError>;

    /// Checks out HEAD, discarding any local modification.
    fn checkout_head_force(&mut self) -> Result<(), SyncError>;

    /// Returns the target of a reference, or `None` if it does not exist.
    fn lookup_ref(&self, refname: &str) -> Result<Option<Oid>, SyncError>;

    /// Creates (or overwrites) a direct reference.
    fn create_ref(&mut self, refname: &str, target: Oid) -> Result<(), SyncError>;

    /// Analyzes merging the tip of `their_ref` into HEAD.
    fn merge_analysis(&self, their_ref: &str) -> Result<MergeAnalysis, SyncError>;

    /// Merges the tip of `their_ref` into HEAD, the index and the working tree.
    fn merge(&mut self, their_ref: &str) -> Result<(), SyncError>;

    /// Returns true if the index holds unresolved conflicts.
    fn has_conflicts(&self) -> Result<bool, SyncError>;

    /// Moves an existing reference to a new target.
    fn set_ref_target(&mut self, refname: &str, target: Oid) -> Result<(), SyncError>;

    /// Removes in-progress merge/rebase metadata and conflicted index entries.
    fn cleanup_state(&mut self) -> Result<(), SyncError>;
}

/// Relationship between HEAD and the fetched remote tip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MergeAnalysis {
    /// HEAD already contains the remote tip.
    UpToDate,
    /// HEAD is an ancestor of the remote tip.
    FastForward,
    /// Histories diverged.
    Normal,
    /// HEAD points at a branch with no commits.
    Unborn,
    /// Anything else.
    Unsupported,
}

impl MergeAnalysis {
    /// Classifies libgit2 merge analysis flags.
    ///
    /// libgit2 reports an unborn HEAD together with the fast-forward bit, so
    /// unborn is checked first.
    pub fn from_flags(flags: git2::MergeAnalysis) -> Self {
        if flags.is_up_to_date() {
            Self::UpToDate
        } else if flags.is_unborn() {
            Self::Unborn
        } else if flags.is_fast_forward() {
            Self::FastForward
        } else if flags.is_normal() {
            Self::Normal
        } else {
            Self::Unsupported
        }
    }

    /// Returns the metric/log label for this analysis.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UpToDate => "up_to_date",
            Self::FastForward => "fast_forward",
            Self::Normal => "normal",
            Self::Unborn => "unborn",
            Self::Unsupported => "unsupported",
        }
    }

    /// Returns true if applying this analysis changes the working copy.
    pub fn changes_working_copy(&self) -> bool {
        matches!(self, Self::FastForward | Self::Normal)
    }
}

impl fmt::Display for MergeAnalysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
