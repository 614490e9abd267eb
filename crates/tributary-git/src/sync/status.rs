//! Per-repository synchronization status.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use serde::Serialize;

use super::PollReport;

#[derive(Debug, Default)]
struct Inner {
    cloned: bool,
    branches: BTreeMap<String, String>,
    last_success: Option<Instant>,
    last_error: Option<String>,
    failure_count: u32,
    polls: u64,
}

/// Tracks what a repository's scheduler task has done.
///
/// Only the owning task writes to it; the status endpoint reads snapshots.
#[derive(Debug)]
pub struct SyncStatus {
    name: String,
    inner: RwLock<Inner>,
}

impl SyncStatus {
    /// Creates an empty status for a repository.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            inner: RwLock::new(Inner::default()),
        }
    }

    /// Returns the repository name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Marks the working copy as present.
    pub fn set_cloned(&self, cloned: bool) {
        self.inner.write().cloned = cloned;
    }

    /// Records the outcome of a poll.
    ///
    /// Synced branches are updated even when others failed; any failure
    /// counts the poll as failed.
    pub fn record_report(&self, report: &PollReport) {
        let mut inner = self.inner.write();
        inner.polls += 1;
        inner.cloned = true;

        for synced in report.synced() {
            inner
                .branches
                .insert(synced.branch.clone(), synced.target.to_string());
        }

        match report.failures() {
            [] => {
                inner.last_success = Some(Instant::now());
                inner.last_error = None;
                inner.failure_count = 0;
            },
            failures => {
                let message = failures
                    .iter()
                    .map(|f| format!("{}: {}", f.branch, f.error))
                    .collect::<Vec<_>>()
                    .join("; ");
                inner.last_error = Some(message);
                inner.failure_count += 1;
            },
        }
    }

    /// Records a poll that failed as a whole.
    pub fn record_failure(&self, error: impl Into<String>) {
        let mut inner = self.inner.write();
        inner.polls += 1;
        inner.last_error = Some(error.into());
        inner.failure_count += 1;
    }

    /// Returns the last error message.
    pub fn last_error(&self) -> Option<String> {
        self.inner.read().last_error.clone()
    }

    /// Returns the number of consecutive failed polls.
    pub fn failure_count(&self) -> u32 {
        self.inner.read().failure_count
    }

    /// Returns the commit a branch was last synced to.
    pub fn branch_commit(&self, branch: &str) -> Option<String> {
        self.inner.read().branches.get(branch).cloned()
    }

    /// Returns the duration since the last fully successful poll.
    pub fn time_since_success(&self) -> Option<Duration> {
        self.inner.read().last_success.map(|t| t.elapsed())
    }

    /// Returns true if the last poll did not fail.
    pub fn is_healthy(&self) -> bool {
        self.inner.read().last_error.is_none()
    }

    /// Returns a serializable copy of the current status.
    pub fn snapshot(&self) -> StatusSnapshot {
        let inner = self.inner.read();
        StatusSnapshot {
            name: self.name.clone(),
            cloned: inner.cloned,
            healthy: inner.last_error.is_none(),
            branches: inner.branches.clone(),
            last_error: inner.last_error.clone(),
            consecutive_failures: inner.failure_count,
            polls: inner.polls,
            seconds_since_success: inner.last_success.map(|t| t.elapsed().as_secs()),
        }
    }
}

/// Point-in-time view of a [`SyncStatus`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSnapshot {
    pub name: String,
    pub cloned: bool,
    pub healthy: bool,
    pub branches: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
    pub consecutive_failures: u32,
    pub polls: u64,
    pub seconds_since_success: Option<u64>,
}
