//! Tributary mirror daemon.

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use tributary_git::{Git2Backend, Registry};
use tributary_server::metrics::init_metrics;
use tributary_server::{AppState, Settings, run_server, shutdown_signal};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = Settings::load().context("Failed to load settings")?;
    let addr = settings.address()?;

    tracing::info!(
        "Starting Tributary Server v{}",
        env!("CARGO_PKG_VERSION")
    );
    tracing::info!("Local store: {}", settings.mirror.local_store().display());
    for repo in &settings.mirror.repos {
        tracing::info!(
            repository = %repo.name(),
            url = %repo.url(),
            branches = ?repo.branches(),
            "Mirroring repository"
        );
    }

    let prometheus_handle = init_metrics().context("Failed to install metrics recorder")?;

    let registry = Registry::start_all(&settings.mirror, Arc::new(Git2Backend::new()));
    let state = AppState::from_registry(&registry);

    let served = run_server(addr, state, prometheus_handle, shutdown_signal()).await;

    // Let in-flight syncs finish before exiting.
    registry.shutdown().await;

    served.with_context(|| format!("Server on {} failed", addr))
}
