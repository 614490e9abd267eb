//! Results of a poll.

use crate::backend::{MergeAnalysis, Oid};
use crate::error::SyncError;

/// A branch that was brought in line with its remote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchSync {
    /// Branch name.
    pub branch: String,
    /// How the local branch related to the remote before the pull.
    pub analysis: MergeAnalysis,
    /// Commit the local branch points at after the pull.
    pub target: Oid,
}

/// A branch whose pull failed.
#[derive(Debug)]
pub struct BranchFailure {
    /// Branch name.
    pub branch: String,
    /// Why the pull failed.
    pub error: SyncError,
}

/// What a single poll of a repository did.
#[derive(Debug)]
pub enum PollReport {
    /// The working copy did not exist and was cloned.
    Cloned,
    /// Every configured branch was pulled, some possibly unsuccessfully.
    Pulled {
        synced: Vec<BranchSync>,
        failed: Vec<BranchFailure>,
    },
}

impl PollReport {
    /// Returns the branches that were synced.
    pub fn synced(&self) -> &[BranchSync] {
        match self {
            Self::Cloned => &[],
            Self::Pulled { synced, .. } => synced,
        }
    }

    /// Returns the branches that failed.
    pub fn failures(&self) -> &[BranchFailure] {
        match self {
            Self::Cloned => &[],
            Self::Pulled { failed, .. } => failed,
        }
    }

    /// Returns true if no branch failed.
    pub fn is_clean(&self) -> bool {
        self.failures().is_empty()
    }

    /// Returns the metric label for this poll.
    pub fn outcome(&self) -> &'static str {
        match self {
            Self::Cloned => "cloned",
            Self::Pulled { failed, .. } if failed.is_empty() => "pulled",
            Self::Pulled { .. } => "partial",
        }
    }
}
