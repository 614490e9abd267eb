//! Working copies backed by libgit2.

use std::path::Path;

use git2::build::{CheckoutBuilder, RepoBuilder};
use git2::{Cred, ErrorCode, FetchOptions, RemoteCallbacks, Repository, ResetType};
use tracing::debug;
use tributary_core::{Credentials, RepositoryConfig};

use super::{MergeAnalysis, Oid, VcsBackend, WorkingCopy};
use crate::error::SyncError;

/// Credential callbacks give up after this many rejected attempts.
const MAX_CREDENTIAL_ATTEMPTS: u32 = 3;

/// Backend that opens and clones libgit2 repositories.
#[derive(Debug, Clone, Copy, Default)]
pub struct Git2Backend;

impl Git2Backend {
    /// Creates a new libgit2 backend.
    pub fn new() -> Self {
        Self
    }
}

impl VcsBackend for Git2Backend {
    type Copy = Git2WorkingCopy;

    fn open(
        &self,
        repository: &RepositoryConfig,
        path: &Path,
    ) -> Result<Option<Self::Copy>, SyncError> {
        match Repository::open(path) {
            Ok(repo) => Ok(Some(Git2WorkingCopy::new(
                repo,
                repository.credentials().cloned(),
            ))),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(None),
            Err(e) => Err(SyncError::Open {
                path: path.to_path_buf(),
                reason: e.message().to_string(),
            }),
        }
    }

    fn clone_repository(
        &self,
        repository: &RepositoryConfig,
        path: &Path,
    ) -> Result<Self::Copy, SyncError> {
        let credentials = repository.credentials().cloned();

        let mut fetch_options = FetchOptions::new();
        fetch_options.remote_callbacks(remote_callbacks(credentials.as_ref()));

        let repo = RepoBuilder::new()
            .fetch_options(fetch_options)
            .clone(repository.url(), path)
            .map_err(|e| SyncError::Clone {
                url: repository.url().to_string(),
                reason: e.message().to_string(),
            })?;

        Ok(Git2WorkingCopy::new(repo, credentials))
    }
}

/// Builds remote callbacks that answer credential requests.
///
/// Configured credentials are offered for user/password prompts, the SSH
/// agent for key prompts, and the Git credential helper as a fallback.
fn remote_callbacks(credentials: Option<&Credentials>) -> RemoteCallbacks<'_> {
    let mut attempts = 0;
    let mut callbacks = RemoteCallbacks::new();

    callbacks.credentials(move |url, username_from_url, allowed| {
        attempts += 1;
        if attempts > MAX_CREDENTIAL_ATTEMPTS {
            return Err(git2::Error::from_str("authentication failed"));
        }

        if allowed.is_user_pass_plaintext() {
            if let Some(creds) = credentials {
                return Cred::userpass_plaintext(&creds.username, &creds.password);
            }

            if let Ok(config) = git2::Config::open_default()
                && let Ok(cred) = Cred::credential_helper(&config, url, username_from_url)
            {
                return Ok(cred);
            }
        }

        if allowed.is_ssh_key()
            && let Some(user) = username_from_url
        {
            return Cred::ssh_key_from_agent(user);
        }

        Cred::default()
    });

    callbacks
}

/// A libgit2 working copy.
pub struct Git2WorkingCopy {
    repo: Repository,
    credentials: Option<Credentials>,
}

impl Git2WorkingCopy {
    fn new(repo: Repository, credentials: Option<Credentials>) -> Self {
        Self { repo, credentials }
    }

    /// Returns the underlying libgit2 repository.
    pub fn repository(&self) -> &Repository {
        &self.repo
    }

    fn annotated_commit(&self, their_ref: &str) -> Result<git2::AnnotatedCommit<'_>, SyncError> {
        let reference = self
            .repo
            .find_reference(their_ref)
            .map_err(|e| SyncError::ref_resolution(their_ref, e.message()))?;

        self.repo
            .reference_to_annotated_commit(&reference)
            .map_err(|e| SyncError::ref_resolution(their_ref, e.message()))
    }
}

impl WorkingCopy for Git2WorkingCopy {
    fn find_remote(&self, name: &str) -> Result<(), SyncError> {
        self.repo
            .find_remote(name)
            .map(|_| ())
            .map_err(|_| SyncError::RemoteNotFound(name.to_string()))
    }

    fn fetch(&mut self, remote: &str, refspecs: &[&str]) -> Result<(), SyncError> {
        let mut origin = self
            .repo
            .find_remote(remote)
            .map_err(|_| SyncError::RemoteNotFound(remote.to_string()))?;

        let mut fetch_options = FetchOptions::new();
        fetch_options.remote_callbacks(remote_callbacks(self.credentials.as_ref()));

        debug!("Fetching {:?} from {}", refspecs, remote);

        origin
            .fetch(refspecs, Some(&mut fetch_options), None)
            .map_err(|e| SyncError::fetch(refspecs.join(" "), e.message()))
    }

    fn set_head(&mut self, refname: &str) -> Result<(), SyncError> {
        self.repo
            .set_head(refname)
            .map_err(|e| SyncError::HeadUpdate {
                refname: refname.to_string(),
                reason: e.message().to_string(),
            })
    }

    fn checkout_head_force(&mut self) -> Result<(), SyncError> {
        let mut checkout = CheckoutBuilder::new();
        checkout.force();

        self.repo
            .checkout_head(Some(&mut checkout))
            .map_err(|e| SyncError::Checkout(e.message().to_string()))
    }

    fn lookup_ref(&self, refname: &str) -> Result<Option<Oid>, SyncError> {
        match self.repo.refname_to_id(refname) {
            Ok(oid) => Ok(Some(oid)),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(None),
            Err(e) => Err(SyncError::ref_resolution(refname, e.message())),
        }
    }

    fn create_ref(&mut self, refname: &str, target: Oid) -> Result<(), SyncError> {
        self.repo
            .reference(refname, target, true, "tributary: create branch")
            .map(|_| ())
            .map_err(|e| SyncError::ref_resolution(refname, e.message()))
    }

    fn merge_analysis(&self, their_ref: &str) -> Result<MergeAnalysis, SyncError> {
        let annotated = self.annotated_commit(their_ref)?;

        let (analysis, _preference) = self
            .repo
            .merge_analysis(&[&annotated])
            .map_err(|e| SyncError::MergeAnalysis(e.message().to_string()))?;

        Ok(MergeAnalysis::from_flags(analysis))
    }

    fn merge(&mut self, their_ref: &str) -> Result<(), SyncError> {
        let annotated = self.annotated_commit(their_ref)?;

        self.repo
            .merge(&[&annotated], None, None)
            .map_err(|e| SyncError::MergeApply(e.message().to_string()))
    }

    fn has_conflicts(&self) -> Result<bool, SyncError> {
        self.repo
            .index()
            .map(|index| index.has_conflicts())
            .map_err(|e| SyncError::MergeApply(e.message().to_string()))
    }

    fn set_ref_target(&mut self, refname: &str, target: Oid) -> Result<(), SyncError> {
        let mut reference = self
            .repo
            .find_reference(refname)
            .map_err(|e| SyncError::ref_update(refname, e.message()))?;

        reference
            .set_target(target, "tributary: sync with remote")
            .map(|_| ())
            .map_err(|e| SyncError::ref_update(refname, e.message()))
    }

    fn cleanup_state(&mut self) -> Result<(), SyncError> {
        self.repo
            .cleanup_state()
            .map_err(|e| SyncError::Cleanup(e.message().to_string()))?;

        if !self.has_conflicts()? {
            return Ok(());
        }

        // Conflict markers live in the index; a hard reset to HEAD clears them.
        let head = self
            .repo
            .head()
            .and_then(|head| head.peel_to_commit())
            .map_err(|e| SyncError::Cleanup(e.message().to_string()))?;

        self.repo
            .reset(head.as_object(), ResetType::Hard, None)
            .map_err(|e| SyncError::Cleanup(e.message().to_string()))
    }
}

impl std::fmt::Debug for Git2WorkingCopy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Git2WorkingCopy")
            .field("path", &self.repo.path())
            .field("credentials", &self.credentials.is_some())
            .finish()
    }
}
