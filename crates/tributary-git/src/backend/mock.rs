//! Recording in-memory backend for unit tests.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;
use tributary_core::RepositoryConfig;

use super::{MergeAnalysis, Oid, VcsBackend, WorkingCopy};
use crate::error::SyncError;

/// Builds a deterministic object id.
pub(crate) fn oid(n: u8) -> Oid {
    Oid::from_bytes(&[n; 20]).unwrap()
}

/// Shared state of a mocked remote and its working copy.
#[derive(Debug, Default)]
pub(crate) struct MockState {
    /// Every backend call, in order.
    pub calls: Vec<String>,
    /// References in the working copy.
    pub refs: HashMap<String, Oid>,
    /// Where HEAD points.
    pub head: Option<String>,
    /// Branch tips on the remote.
    pub upstream: HashMap<String, Oid>,
    /// Branches whose fetch fails.
    pub failing_fetches: HashSet<String>,
    /// Branches whose history diverged from the remote.
    pub diverged: HashSet<String>,
    /// Merges of these branches leave conflicts behind.
    pub conflicting: HashSet<String>,
    /// Unresolved conflicts in the index.
    pub index_conflicts: bool,
    /// Whether `origin` exists.
    pub has_origin: bool,
    /// Whether clones fail.
    pub fail_clone: bool,
}

impl MockState {
    pub fn count(&self, prefix: &str) -> usize {
        self.calls.iter().filter(|c| c.starts_with(prefix)).count()
    }

    fn branch_of(refname: &str) -> &str {
        refname
            .strip_prefix("refs/remotes/origin/")
            .or_else(|| refname.strip_prefix("refs/heads/"))
            .unwrap_or(refname)
    }
}

pub(crate) type SharedState = Arc<Mutex<MockState>>;

/// Creates mock state with `origin` configured and the given remote branches.
pub(crate) fn remote_with(branches: &[(&str, u8)]) -> SharedState {
    let state = MockState {
        has_origin: true,
        upstream: branches
            .iter()
            .map(|(name, n)| (name.to_string(), oid(*n)))
            .collect(),
        ..Default::default()
    };
    Arc::new(Mutex::new(state))
}

#[derive(Debug, Clone)]
pub(crate) struct MockBackend {
    pub state: SharedState,
}

impl MockBackend {
    pub fn new(state: SharedState) -> Self {
        Self { state }
    }

    /// Returns a working copy that already mirrors `branch` at the remote tip.
    pub fn cloned_copy(&self, branch: &str) -> MockCopy {
        let mut state = self.state.lock();
        if let Some(tip) = state.upstream.get(branch).copied() {
            state.refs.insert(format!("refs/heads/{}", branch), tip);
            state
                .refs
                .insert(format!("refs/remotes/origin/{}", branch), tip);
        }
        state.head = Some(format!("refs/heads/{}", branch));
        MockCopy {
            state: Arc::clone(&self.state),
        }
    }
}

impl VcsBackend for MockBackend {
    type Copy = MockCopy;

    fn open(
        &self,
        _repository: &RepositoryConfig,
        path: &Path,
    ) -> Result<Option<Self::Copy>, SyncError> {
        self.state.lock().calls.push("open".to_string());
        if path.join(".git").exists() {
            Ok(Some(MockCopy {
                state: Arc::clone(&self.state),
            }))
        } else {
            Ok(None)
        }
    }

    fn clone_repository(
        &self,
        repository: &RepositoryConfig,
        path: &Path,
    ) -> Result<Self::Copy, SyncError> {
        self.state.lock().calls.push("clone".to_string());
        if self.state.lock().fail_clone {
            return Err(SyncError::Clone {
                url: repository.url().to_string(),
                reason: "connection refused".to_string(),
            });
        }

        std::fs::create_dir_all(path.join(".git")).map_err(|e| SyncError::Clone {
            url: repository.url().to_string(),
            reason: e.to_string(),
        })?;

        Ok(self.cloned_copy(&repository.branches()[0]))
    }
}

#[derive(Debug)]
pub(crate) struct MockCopy {
    state: SharedState,
}

impl WorkingCopy for MockCopy {
    fn find_remote(&self, name: &str) -> Result<(), SyncError> {
        let mut state = self.state.lock();
        state.calls.push(format!("find_remote {}", name));
        if state.has_origin {
            Ok(())
        } else {
            Err(SyncError::RemoteNotFound(name.to_string()))
        }
    }

    fn fetch(&mut self, _remote: &str, refspecs: &[&str]) -> Result<(), SyncError> {
        let mut state = self.state.lock();
        for refspec in refspecs {
            state.calls.push(format!("fetch {}", refspec));
            let Some((_, dst)) = refspec.split_once(':') else {
                continue;
            };
            let branch = MockState::branch_of(dst).to_string();

            if state.failing_fetches.contains(&branch) {
                return Err(SyncError::fetch(*refspec, "couldn't find remote ref"));
            }
            if let Some(tip) = state.upstream.get(&branch).copied() {
                state.refs.insert(dst.to_string(), tip);
            }
        }
        Ok(())
    }

    fn set_head(&mut self, refname: &str) -> Result<(), SyncError> {
        let mut state = self.state.lock();
        state.calls.push(format!("set_head {}", refname));
        state.head = Some(refname.to_string());
        Ok(())
    }

    fn checkout_head_force(&mut self) -> Result<(), SyncError> {
        self.state.lock().calls.push("checkout".to_string());
        Ok(())
    }

    fn lookup_ref(&self, refname: &str) -> Result<Option<Oid>, SyncError> {
        Ok(self.state.lock().refs.get(refname).copied())
    }

    fn create_ref(&mut self, refname: &str, target: Oid) -> Result<(), SyncError> {
        let mut state = self.state.lock();
        state.calls.push(format!("create_ref {}", refname));
        state.refs.insert(refname.to_string(), target);
        Ok(())
    }

    fn merge_analysis(&self, their_ref: &str) -> Result<MergeAnalysis, SyncError> {
        let state = self.state.lock();
        let head = state
            .head
            .as_ref()
            .and_then(|head| state.refs.get(head))
            .copied();
        let theirs = state
            .refs
            .get(their_ref)
            .copied()
            .ok_or_else(|| SyncError::ref_resolution(their_ref, "not found"))?;

        let analysis = match head {
            None => MergeAnalysis::Unborn,
            Some(ours) if ours == theirs => MergeAnalysis::UpToDate,
            Some(_) if state.diverged.contains(MockState::branch_of(their_ref)) => {
                MergeAnalysis::Normal
            },
            Some(_) => MergeAnalysis::FastForward,
        };
        Ok(analysis)
    }

    fn merge(&mut self, their_ref: &str) -> Result<(), SyncError> {
        let mut state = self.state.lock();
        state.calls.push(format!("merge {}", their_ref));
        if state.conflicting.contains(MockState::branch_of(their_ref)) {
            state.index_conflicts = true;
        }
        Ok(())
    }

    fn has_conflicts(&self) -> Result<bool, SyncError> {
        Ok(self.state.lock().index_conflicts)
    }

    fn set_ref_target(&mut self, refname: &str, target: Oid) -> Result<(), SyncError> {
        let mut state = self.state.lock();
        state.calls.push(format!("set_target {}", refname));
        match state.refs.get_mut(refname) {
            Some(current) => {
                *current = target;
                Ok(())
            },
            None => Err(SyncError::ref_update(refname, "not found")),
        }
    }

    fn cleanup_state(&mut self) -> Result<(), SyncError> {
        let mut state = self.state.lock();
        state.calls.push("cleanup".to_string());
        state.index_conflicts = false;
        Ok(())
    }
}
