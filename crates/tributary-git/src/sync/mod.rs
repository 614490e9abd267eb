//! Repository synchronization.
//!
//! This module contains the pull state machine, the per-repository poll
//! scheduler and the status each scheduler task keeps.

mod pull;
mod report;
mod scheduler;
mod status;
mod task;

pub use pull::pull;
pub use report::{BranchFailure, BranchSync, PollReport};
pub use scheduler::{PollScheduler, SchedulerHandle, SyncTarget};
pub use status::{StatusSnapshot, SyncStatus};
pub use task::RepositoryTask;
