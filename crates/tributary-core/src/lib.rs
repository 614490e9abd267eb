//! Tributary Core - configuration model
//!
//! This crate holds the data model shared by the synchronization engine and
//! the server binary: which repositories are mirrored, where they are stored,
//! which branches are tracked and how often they are polled.

pub mod config;
pub mod error;

pub use config::{
    Credentials, DEFAULT_POLL_INTERVAL, Hook, HookKind, MirrorConfig, RepositoryConfig,
    RepositoryConfigBuilder, validate_branch_name,
};
pub use error::{ConfigError, Result};

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
