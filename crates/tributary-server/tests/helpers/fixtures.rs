//! Estados de repositorio para tests.

use std::sync::Arc;

use axum::Router;
use metrics_exporter_prometheus::PrometheusBuilder;
use tributary_git::{PollReport, SyncStatus};
use tributary_server::{AppState, create_router};

/// A repository that has been cloned and polled once without errors.
pub fn healthy(name: &str) -> Arc<SyncStatus> {
    let status = Arc::new(SyncStatus::new(name));
    status.set_cloned(true);
    status.record_report(&PollReport::Cloned);
    status
}

/// A repository whose last poll failed.
pub fn failing(name: &str, error: &str) -> Arc<SyncStatus> {
    let status = Arc::new(SyncStatus::new(name));
    status.record_failure(error);
    status
}

/// Router over the given statuses, with a recorder that is not installed
/// globally.
pub fn router(statuses: Vec<Arc<SyncStatus>>) -> Router {
    let handle = PrometheusBuilder::new().build_recorder().handle();
    create_router(AppState::new(statuses), handle)
}
