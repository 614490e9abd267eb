use axum::{Json, extract::State};
use serde::Serialize;

use crate::state::AppState;

pub const STATUS_UP: &str = "UP";
pub const STATUS_DEGRADED: &str = "DEGRADED";

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub repositories: usize,
    pub failing: Vec<String>,
}

impl HealthResponse {
    /// Summarizes the repository statuses held by `state`.
    pub fn from_state(state: &AppState) -> Self {
        let failing: Vec<String> = state
            .statuses()
            .iter()
            .filter(|status| !status.is_healthy())
            .map(|status| status.name().to_string())
            .collect();

        let status = if failing.is_empty() {
            STATUS_UP
        } else {
            STATUS_DEGRADED
        };

        Self {
            status: status.to_string(),
            repositories: state.statuses().len(),
            failing,
        }
    }
}

/// The daemon is alive as long as it answers; failing repositories only
/// degrade the reported status.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::from_state(&state))
}
