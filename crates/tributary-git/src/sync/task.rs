//! Scheduler target that syncs a repository handle off the async runtime.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;

use super::{PollReport, SyncStatus, SyncTarget};
use crate::backend::VcsBackend;
use crate::error::SyncError;
use crate::metrics;
use crate::repository::RepositoryHandle;

/// Owns a [`RepositoryHandle`] and records what each sync did.
///
/// Git operations block, so every poll moves the handle into
/// `spawn_blocking` and takes it back once the poll is done.
pub struct RepositoryTask<B: VcsBackend> {
    name: String,
    handle: Option<RepositoryHandle<B>>,
    status: Arc<SyncStatus>,
}

impl<B: VcsBackend> RepositoryTask<B> {
    /// Creates a task for a handle.
    pub fn new(handle: RepositoryHandle<B>, status: Arc<SyncStatus>) -> Self {
        status.set_cloned(handle.is_open());
        Self {
            name: handle.name().to_string(),
            handle: Some(handle),
            status,
        }
    }

    /// Returns the shared status.
    pub fn status(&self) -> &Arc<SyncStatus> {
        &self.status
    }

    async fn poll_blocking(&mut self) -> Result<PollReport, SyncError> {
        let mut handle = self
            .handle
            .take()
            .ok_or_else(|| SyncError::task("repository handle unavailable"))?;
        let spare = handle.detached();

        let joined = tokio::task::spawn_blocking(move || {
            let result = handle.poll();
            (handle, result)
        })
        .await;

        match joined {
            Ok((handle, result)) => {
                self.handle = Some(handle);
                result
            },
            Err(e) => {
                // The working copy went down with the task; reopen it next tick.
                self.handle = Some(spare);
                Err(SyncError::task(e))
            },
        }
    }
}

#[async_trait]
impl<B: VcsBackend> SyncTarget for RepositoryTask<B> {
    fn name(&self) -> &str {
        &self.name
    }

    async fn sync(&mut self) -> Result<PollReport, SyncError> {
        let started = Instant::now();
        let result = self.poll_blocking().await;
        metrics::record_poll(&self.name, &result, started.elapsed());

        match &result {
            Ok(report) => self.status.record_report(report),
            Err(e) => self.status.record_failure(e.to_string()),
        }

        result
    }
}
