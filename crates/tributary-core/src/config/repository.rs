//! Per-repository configuration.

use std::collections::HashSet;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{DEFAULT_POLL_INTERVAL, Hook, validate_branch_name};
use crate::error::{ConfigError, Result};

/// Configuration for one mirrored repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryConfig {
    /// Repository name. Also the directory name under the local store.
    name: String,

    /// Remote URL (HTTPS, SSH or a local path). Registered as `origin`.
    url: String,

    /// Branches to keep in sync, in the order they are pulled.
    branches: Vec<String>,

    /// Hooks that drive synchronization.
    #[serde(default)]
    hooks: Vec<Hook>,

    /// Credentials for HTTPS remotes (optional).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    credentials: Option<Credentials>,
}

/// Basic authentication credentials for a remote.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Username.
    pub username: String,
    /// Password or access token.
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl RepositoryConfig {
    /// Creates a new builder for RepositoryConfig.
    pub fn builder() -> RepositoryConfigBuilder {
        RepositoryConfigBuilder::default()
    }

    /// Returns the repository name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the remote URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns the tracked branches in pull order.
    pub fn branches(&self) -> &[String] {
        &self.branches
    }

    /// Returns the configured hooks.
    pub fn hooks(&self) -> &[Hook] {
        &self.hooks
    }

    /// Returns the credentials for the remote, if any.
    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    /// Returns the polling interval, or `None` when polling is disabled.
    ///
    /// The first polling hook wins. Without one the interval falls back to
    /// [`DEFAULT_POLL_INTERVAL`]; an explicit interval of zero disables
    /// polling for the repository.
    pub fn poll_interval(&self) -> Option<Duration> {
        let interval = self
            .hooks
            .iter()
            .find(|hook| hook.is_polling())
            .map(|hook| hook.interval)
            .unwrap_or(DEFAULT_POLL_INTERVAL);

        (!interval.is_zero()).then_some(interval)
    }

    /// Validates the repository configuration.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::invalid_name(&self.name, "name cannot be empty"));
        }

        if self.name == "." || self.name == ".." {
            return Err(ConfigError::invalid_name(
                &self.name,
                "name cannot be '.' or '..'",
            ));
        }

        if self.name.contains('/') || self.name.contains('\\') {
            return Err(ConfigError::invalid_name(
                &self.name,
                "name cannot contain path separators",
            ));
        }

        if self.url.trim().is_empty() {
            return Err(ConfigError::EmptyUrl {
                repository: self.name.clone(),
            });
        }

        if self.branches.is_empty() {
            return Err(ConfigError::NoBranches {
                repository: self.name.clone(),
            });
        }

        let mut seen = HashSet::new();
        for branch in &self.branches {
            validate_branch_name(branch)
                .map_err(|reason| ConfigError::invalid_branch(&self.name, branch, reason))?;

            if !seen.insert(branch.as_str()) {
                return Err(ConfigError::DuplicateBranch {
                    repository: self.name.clone(),
                    branch: branch.clone(),
                });
            }
        }

        Ok(())
    }
}

/// Builder for RepositoryConfig.
#[derive(Debug, Default)]
pub struct RepositoryConfigBuilder {
    name: Option<String>,
    url: Option<String>,
    branches: Vec<String>,
    hooks: Vec<Hook>,
    credentials: Option<Credentials>,
}

impl RepositoryConfigBuilder {
    /// Sets the repository name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the remote URL.
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Adds a branch to track.
    pub fn branch(mut self, branch: impl Into<String>) -> Self {
        self.branches.push(branch.into());
        self
    }

    /// Sets the tracked branches.
    pub fn branches(mut self, branches: Vec<impl Into<String>>) -> Self {
        self.branches = branches.into_iter().map(Into::into).collect();
        self
    }

    /// Adds a hook.
    pub fn hook(mut self, hook: Hook) -> Self {
        self.hooks.push(hook);
        self
    }

    /// Adds a polling hook with the given interval.
    pub fn poll_every(self, interval: Duration) -> Self {
        self.hook(Hook::polling(interval))
    }

    /// Sets basic authentication credentials.
    pub fn basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.credentials = Some(Credentials {
            username: username.into(),
            password: password.into(),
        });
        self
    }

    /// Builds and validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if required fields are missing or invalid.
    pub fn build(self) -> Result<RepositoryConfig> {
        let config = RepositoryConfig {
            name: self.name.ok_or(ConfigError::MissingField { field: "name" })?,
            url: self.url.ok_or(ConfigError::MissingField { field: "url" })?,
            branches: self.branches,
            hooks: self.hooks,
            credentials: self.credentials,
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal() -> RepositoryConfigBuilder {
        RepositoryConfig::builder()
            .name("app-config")
            .url("https://git.example.com/org/app-config.git")
            .branch("main")
    }

    #[test]
    fn test_builder_minimal() {
        let config = minimal().build().unwrap();

        assert_eq!(config.name(), "app-config");
        assert_eq!(config.url(), "https://git.example.com/org/app-config.git");
        assert_eq!(config.branches(), &["main"]);
        assert!(config.hooks().is_empty());
        assert!(config.credentials().is_none());
    }

    #[test]
    fn test_builder_missing_url() {
        let result = RepositoryConfig::builder()
            .name("app-config")
            .branch("main")
            .build();

        assert_eq!(result, Err(ConfigError::MissingField { field: "url" }));
    }

    #[test]
    fn test_poll_interval_default() {
        let config = minimal().build().unwrap();
        assert_eq!(config.poll_interval(), Some(DEFAULT_POLL_INTERVAL));

        let config = minimal().hook(Hook::webhook()).build().unwrap();
        assert_eq!(config.poll_interval(), Some(DEFAULT_POLL_INTERVAL));
    }

    #[test]
    fn test_poll_interval_first_polling_hook_wins() {
        let config = minimal()
            .hook(Hook::webhook())
            .poll_every(Duration::from_secs(30))
            .poll_every(Duration::from_secs(5))
            .build()
            .unwrap();

        assert_eq!(config.poll_interval(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_poll_interval_zero_disables() {
        let config = minimal().poll_every(Duration::ZERO).build().unwrap();
        assert_eq!(config.poll_interval(), None);
    }

    #[test]
    fn test_validate_branches() {
        let result = RepositoryConfig::builder()
            .name("app-config")
            .url("/srv/git/app-config")
            .build();
        assert!(matches!(result, Err(ConfigError::NoBranches { .. })));

        let result = minimal().branch("main").build();
        assert!(matches!(result, Err(ConfigError::DuplicateBranch { .. })));

        let result = minimal().branch("bad branch").build();
        assert!(matches!(result, Err(ConfigError::InvalidBranch { .. })));
    }

    #[test]
    fn test_validate_name() {
        let result = minimal().name("org/app").build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidRepositoryName { .. })
        ));

        let result = minimal().name("..").build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidRepositoryName { .. })
        ));

        let result = minimal().name("  ").build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidRepositoryName { .. })
        ));
    }

    #[test]
    fn test_credentials_debug_redacts_password() {
        let config = minimal().basic_auth("deploy", "s3cret").build().unwrap();
        let debug = format!("{:?}", config);

        assert!(debug.contains("deploy"));
        assert!(!debug.contains("s3cret"));
    }
}
