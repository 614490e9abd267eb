//! Mirror configuration model.

mod branch;
mod hook;
mod mirror;
mod repository;

pub use branch::validate_branch_name;
pub use hook::{DEFAULT_POLL_INTERVAL, Hook, HookKind};
pub use mirror::MirrorConfig;
pub use repository::{Credentials, RepositoryConfig, RepositoryConfigBuilder};
