//! Mirrored repositories and their reference names.

mod handle;
mod refs;

pub use handle::RepositoryHandle;
pub use refs::{BranchRefPair, REMOTE};
