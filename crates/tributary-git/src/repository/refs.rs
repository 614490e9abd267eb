//! Reference names for a synced branch.

use std::fmt;

use tributary_core::validate_branch_name;

use crate::error::SyncError;

/// Name of the remote every mirror fetches from.
pub const REMOTE: &str = "origin";

/// The local and remote-tracking references of one branch.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BranchRefPair {
    branch: String,
    local: String,
    remote: String,
    refspec: String,
}

impl BranchRefPair {
    /// Builds the reference names for `branch`.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::InvalidBranch`] if the name cannot be a reference.
    pub fn new(branch: impl Into<String>) -> Result<Self, SyncError> {
        let branch = branch.into();
        validate_branch_name(&branch).map_err(|reason| SyncError::InvalidBranch {
            branch: branch.clone(),
            reason,
        })?;

        Ok(Self {
            local: format!("refs/heads/{}", branch),
            remote: format!("refs/remotes/{}/{}", REMOTE, branch),
            refspec: format!("+refs/heads/{}:refs/remotes/{}/{}", branch, REMOTE, branch),
            branch,
        })
    }

    /// Returns the short branch name.
    pub fn branch(&self) -> &str {
        &self.branch
    }

    /// Returns the local branch reference (`refs/heads/<branch>`).
    pub fn local(&self) -> &str {
        &self.local
    }

    /// Returns the remote-tracking reference (`refs/remotes/origin/<branch>`).
    pub fn remote(&self) -> &str {
        &self.remote
    }

    /// Returns the forced fetch refspec mapping the remote branch onto its
    /// remote-tracking reference.
    pub fn refspec(&self) -> &str {
        &self.refspec
    }
}

impl fmt::Display for BranchRefPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.branch)
    }
}
