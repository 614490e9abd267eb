//! Server settings.
//!
//! Loaded from an optional file (YAML, JSON or TOML, by extension) and
//! overridden by `TRIBUTARY__*` environment variables, e.g.
//! `TRIBUTARY__SERVER__PORT=9000`.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tributary_core::MirrorConfig;

/// Environment variable naming the settings file.
pub const CONFIG_PATH_VAR: &str = "TRIBUTARY_CONFIG";

/// Settings file used when `TRIBUTARY_CONFIG` is not set.
pub const DEFAULT_CONFIG_PATH: &str = "tributary.yaml";

const ENV_PREFIX: &str = "TRIBUTARY";

/// Errores al cargar la configuracion
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to load settings: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid mirror configuration: {0}")]
    Invalid(#[from] tributary_core::ConfigError),

    #[error("invalid listen address {address}: {source}")]
    Address {
        address: String,
        #[source]
        source: std::net::AddrParseError,
    },
}

/// Listen address of the HTTP status endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8900,
        }
    }
}

/// Complete daemon settings.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    pub mirror: MirrorConfig,
}

impl Settings {
    /// Loads settings from the file named by `TRIBUTARY_CONFIG`.
    pub fn load() -> Result<Self, SettingsError> {
        let path = std::env::var(CONFIG_PATH_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));
        Self::from_path(&path)
    }

    /// Loads settings from `path` plus environment overrides, then validates
    /// the mirror configuration.
    ///
    /// A missing file is not an error as long as the environment provides
    /// the mirror configuration.
    pub fn from_path(path: &Path) -> Result<Self, SettingsError> {
        let settings: Settings = Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        settings.mirror.validate()?;
        Ok(settings)
    }

    /// Returns the socket address to listen on.
    pub fn address(&self) -> Result<SocketAddr, SettingsError> {
        let address = format!("{}:{}", self.server.host, self.server.port);
        address
            .parse()
            .map_err(|source| SettingsError::Address { address, source })
    }
}
