//! Tributary Server - mirror daemon and read-only HTTP status endpoint.
//!
//! Loads [`Settings`], starts one poll scheduler per mirrored repository and
//! serves their status over HTTP until a shutdown signal arrives.

pub mod error;
pub mod handlers;
pub mod metrics;
pub mod server;
pub mod settings;
pub mod state;

pub use error::AppError;
pub use handlers::health::HealthResponse;
pub use server::{create_router, run_server, shutdown_signal};
pub use settings::{ServerSettings, Settings, SettingsError};
pub use state::AppState;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_defined() {
        assert!(!version().is_empty());
    }
}
