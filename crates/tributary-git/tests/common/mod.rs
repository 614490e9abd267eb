#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use git2::{Oid, Repository, RepositoryInitOptions, Signature};
use tempfile::TempDir;
use tributary_core::RepositoryConfig;
use tributary_git::{Git2Backend, RepositoryHandle};

/// A bare "remote" repository plus a directory for the local store.
pub struct Fixture {
    pub dir: TempDir,
    pub origin: Repository,
}

impl Fixture {
    /// Creates a bare origin whose `main` branch holds one commit.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();

        let mut opts = RepositoryInitOptions::new();
        opts.bare(true).initial_head("main");
        let origin = Repository::init_opts(dir.path().join("origin.git"), &opts).unwrap();

        let fixture = Self { dir, origin };
        fixture.commit("main", "application.yml", "server.port: 8080\n", "initial");
        fixture
    }

    pub fn origin_url(&self) -> String {
        self.origin.path().to_str().unwrap().to_string()
    }

    pub fn store(&self) -> PathBuf {
        self.dir.path().join("store").join("app-config")
    }

    /// Commits `file` with `content` on top of `branch` in the origin.
    pub fn commit(&self, branch: &str, file: &str, content: &str, message: &str) -> Oid {
        let refname = format!("refs/heads/{}", branch);
        let parent = self
            .origin
            .refname_to_id(&refname)
            .ok()
            .map(|oid| self.origin.find_commit(oid).unwrap());

        let base_tree = parent.as_ref().map(|c| c.tree().unwrap());
        let mut builder = self.origin.treebuilder(base_tree.as_ref()).unwrap();
        let blob = self.origin.blob(content.as_bytes()).unwrap();
        builder.insert(file, blob, 0o100644).unwrap();
        let tree = self.origin.find_tree(builder.write().unwrap()).unwrap();

        let sig = signature();
        let parents: Vec<_> = parent.iter().collect();
        self.origin
            .commit(Some(&refname), &sig, &sig, message, &tree, &parents)
            .unwrap()
    }

    /// Creates `branch` in the origin at the tip of `from`.
    pub fn branch(&self, branch: &str, from: &str) -> Oid {
        let tip = self.tip(from);
        self.origin
            .reference(&format!("refs/heads/{}", branch), tip, false, "branch")
            .unwrap();
        tip
    }

    /// Returns the tip of an origin branch.
    pub fn tip(&self, branch: &str) -> Oid {
        self.origin
            .refname_to_id(&format!("refs/heads/{}", branch))
            .unwrap()
    }

    pub fn config(&self, branches: &[&str]) -> Arc<RepositoryConfig> {
        Arc::new(
            RepositoryConfig::builder()
                .name("app-config")
                .url(self.origin_url())
                .branches(branches.to_vec())
                .build()
                .unwrap(),
        )
    }

    pub fn handle(&self, branches: &[&str]) -> RepositoryHandle<Git2Backend> {
        RepositoryHandle::open(
            Arc::new(Git2Backend::new()),
            self.config(branches),
            self.store(),
        )
    }

    /// Opens the mirror's working copy directly.
    pub fn mirror(&self) -> Repository {
        Repository::open(self.store()).unwrap()
    }
}

pub fn signature() -> Signature<'static> {
    Signature::now("Tributary Test", "test@example.com").unwrap()
}

/// Commits a file on the mirror's current branch, diverging it from origin.
pub fn commit_locally(repo: &Repository, file: &str, content: &str) -> Oid {
    let workdir = repo.workdir().unwrap();
    std::fs::write(workdir.join(file), content).unwrap();

    let mut index = repo.index().unwrap();
    index.add_path(Path::new(file)).unwrap();
    index.write().unwrap();
    let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();

    let head = repo.head().unwrap().peel_to_commit().unwrap();
    let sig = signature();
    repo.commit(Some("HEAD"), &sig, &sig, "local change", &tree, &[&head])
        .unwrap()
}

pub fn read(repo: &Repository, file: &str) -> String {
    std::fs::read_to_string(repo.workdir().unwrap().join(file)).unwrap()
}
