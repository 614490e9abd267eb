//! Pulling one branch of a working copy.

use tracing::{debug, info, warn};

use super::BranchSync;
use crate::backend::{MergeAnalysis, WorkingCopy};
use crate::error::SyncError;
use crate::repository::{BranchRefPair, REMOTE};

/// Brings `branch` of the working copy in line with `origin`.
///
/// Local modifications are discarded: the working copy is a disposable
/// mirror. Merge and rebase state is cleaned up whether the pull succeeds or
/// not, so the next pull always starts from a clean repository.
pub fn pull<C: WorkingCopy>(
    copy: &mut C,
    repository: &str,
    branch: &str,
) -> Result<BranchSync, SyncError> {
    let refs = BranchRefPair::new(branch)?;

    let result = pull_branch(copy, repository, &refs);
    let cleanup = copy.cleanup_state();

    match (result, cleanup) {
        (Ok(synced), Ok(())) => Ok(synced),
        (Ok(_), Err(e)) => Err(e),
        (Err(e), Err(cleanup_err)) => {
            warn!(
                repository = %repository,
                branch = %branch,
                "Cleanup after failed pull also failed: {}",
                cleanup_err
            );
            Err(e)
        },
        (Err(e), Ok(())) => Err(e),
    }
}

fn pull_branch<C: WorkingCopy>(
    copy: &mut C,
    repository: &str,
    refs: &BranchRefPair,
) -> Result<BranchSync, SyncError> {
    copy.find_remote(REMOTE)?;
    copy.fetch(REMOTE, &[refs.refspec()])?;

    let remote_target = copy
        .lookup_ref(refs.remote())?
        .ok_or_else(|| SyncError::RemoteRefNotFound(refs.remote().to_string()))?;

    // A newly tracked branch has no local ref until its first pull.
    if copy.lookup_ref(refs.local())?.is_none() {
        debug!(
            repository = %repository,
            branch = %refs,
            "Creating local branch at {}",
            remote_target
        );
        copy.create_ref(refs.local(), remote_target)?;
    }

    // Forced even when up to date: it is what discards local edits.
    copy.set_head(refs.local())?;
    copy.checkout_head_force()?;

    let analysis = copy.merge_analysis(refs.remote())?;
    match analysis {
        MergeAnalysis::UpToDate => {
            debug!(
                "Skipping pull on repository {}, branch {}. Already up to date",
                repository, refs
            );
        },
        MergeAnalysis::FastForward => {
            info!(
                "Changes detected on repository {} branch {}, fast-forwarding",
                repository, refs
            );
            copy.merge(refs.remote())?;
        },
        MergeAnalysis::Normal => {
            info!(
                "Changes detected on repository {}, merging commits from branch {}",
                repository, refs
            );
            copy.merge(refs.remote())?;

            if copy.has_conflicts()? {
                // Drop the merge and the local history with it so the
                // mirror follows origin again on the next pull.
                copy.cleanup_state()?;
                copy.set_ref_target(refs.local(), remote_target)?;
                copy.checkout_head_force()?;

                return Err(SyncError::MergeConflict {
                    branch: refs.branch().to_string(),
                });
            }
        },
        MergeAnalysis::Unborn | MergeAnalysis::Unsupported => {
            return Err(SyncError::UnsupportedMerge {
                branch: refs.branch().to_string(),
                analysis: analysis.to_string(),
            });
        },
    }

    // The local branch always ends up exactly at the remote tip.
    copy.set_ref_target(refs.local(), remote_target)?;

    if analysis.changes_working_copy() {
        copy.checkout_head_force()?;
    }

    Ok(BranchSync {
        branch: refs.branch().to_string(),
        analysis,
        target: remote_target,
    })
}
