//! Repository registry: one scheduler per configured repository.

use std::sync::Arc;

use tracing::info;
use tributary_core::MirrorConfig;

use crate::backend::VcsBackend;
use crate::repository::RepositoryHandle;
use crate::sync::{PollScheduler, RepositoryTask, SchedulerHandle, SyncStatus};

/// A repository whose scheduler has been started.
#[derive(Debug)]
pub struct RegisteredRepository {
    name: String,
    status: Arc<SyncStatus>,
    scheduler: SchedulerHandle,
}

impl RegisteredRepository {
    /// Returns the repository name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the repository's sync status.
    pub fn status(&self) -> &Arc<SyncStatus> {
        &self.status
    }

    /// Returns the repository's scheduler handle.
    pub fn scheduler(&self) -> &SchedulerHandle {
        &self.scheduler
    }
}

/// Live set of mirrored repositories.
#[derive(Debug, Default)]
pub struct Registry {
    repositories: Vec<RegisteredRepository>,
}

impl Registry {
    /// Starts one independent scheduler per configured repository.
    ///
    /// Each repository's existing working copy is opened if present; a
    /// missing one is cloned by its first poll. Returns as soon as every
    /// scheduler has been spawned. Must be called from within a tokio runtime.
    pub fn start_all<B: VcsBackend>(config: &MirrorConfig, backend: Arc<B>) -> Self {
        let mut repositories = Vec::with_capacity(config.repos.len());

        for repo in &config.repos {
            let store = config.store_path(repo);
            let interval = repo.poll_interval();
            let status = Arc::new(SyncStatus::new(repo.name()));

            let handle =
                RepositoryHandle::open(Arc::clone(&backend), Arc::new(repo.clone()), store);
            let task = RepositoryTask::new(handle, Arc::clone(&status));
            let scheduler = PollScheduler::new(task, interval).start();

            repositories.push(RegisteredRepository {
                name: repo.name().to_string(),
                status,
                scheduler,
            });
        }

        info!("Started {} repository scheduler(s)", repositories.len());

        Self { repositories }
    }

    /// Returns the registered repositories in configuration order.
    pub fn repositories(&self) -> &[RegisteredRepository] {
        &self.repositories
    }

    /// Returns the status of every repository.
    pub fn statuses(&self) -> Vec<Arc<SyncStatus>> {
        self.repositories
            .iter()
            .map(|repo| Arc::clone(&repo.status))
            .collect()
    }

    /// Finds a repository by name.
    pub fn get(&self, name: &str) -> Option<&RegisteredRepository> {
        self.repositories.iter().find(|repo| repo.name == name)
    }

    /// Requests an immediate sync of a repository.
    ///
    /// Returns false if the repository is unknown.
    pub fn trigger(&self, name: &str) -> bool {
        match self.get(name) {
            Some(repo) => {
                repo.scheduler.trigger();
                true
            },
            None => false,
        }
    }

    /// Returns the number of registered repositories.
    pub fn len(&self) -> usize {
        self.repositories.len()
    }

    /// Returns true if no repository is registered.
    pub fn is_empty(&self) -> bool {
        self.repositories.is_empty()
    }

    /// Stops every scheduler and waits for them to exit.
    pub async fn shutdown(self) {
        info!("Stopping {} repository scheduler(s)", self.repositories.len());
        for repo in self.repositories {
            repo.scheduler.shutdown().await;
        }
    }
}
