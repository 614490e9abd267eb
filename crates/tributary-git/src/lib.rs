//! # Tributary Git Engine
//!
//! Keeps local mirrors of remote Git repositories synchronized.
//!
//! For every configured repository the engine either clones the remote (first
//! run) or, for each tracked branch, fetches it, classifies the relationship
//! between local and remote history and fast-forwards or merges accordingly.
//! Every repository is driven by its own scheduler task.
//!
//! ## Features
//!
//! - Git operations via libgit2, behind a mockable [`VcsBackend`] trait
//! - Per-branch failure isolation within a poll
//! - One independent, cancellable poll loop per repository
//! - Per-repository status snapshots and Prometheus-friendly metrics
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use tributary_git::{Git2Backend, Registry};
//!
//! let registry = Registry::start_all(&mirror_config, Arc::new(Git2Backend::new()));
//!
//! // ... later
//! registry.shutdown().await;
//! ```

pub mod backend;
pub mod error;
pub mod metrics;
pub mod registry;
pub mod repository;
pub mod sync;

// Re-exports
pub use backend::{Git2Backend, Git2WorkingCopy, MergeAnalysis, Oid, VcsBackend, WorkingCopy};
pub use error::SyncError;
pub use registry::{RegisteredRepository, Registry};
pub use repository::{BranchRefPair, REMOTE, RepositoryHandle};
pub use sync::{
    BranchFailure, BranchSync, PollReport, PollScheduler, RepositoryTask, SchedulerHandle,
    StatusSnapshot, SyncStatus, SyncTarget, pull,
};

// Re-export tributary_core for consumers
pub use tributary_core;
