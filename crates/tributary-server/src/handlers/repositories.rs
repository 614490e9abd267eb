//! Repository status handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use tracing::debug;
use tributary_git::StatusSnapshot;

use crate::error::AppError;
use crate::state::AppState;

/// GET /repositories
pub async fn list_repositories(State(state): State<AppState>) -> Json<Vec<StatusSnapshot>> {
    Json(
        state
            .statuses()
            .iter()
            .map(|status| status.snapshot())
            .collect(),
    )
}

/// GET /repositories/{name}
pub async fn get_repository(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<StatusSnapshot>, AppError> {
    debug!(repository = %name, "Fetching repository status");

    state
        .status(&name)
        .map(|status| Json(status.snapshot()))
        .ok_or(AppError::RepositoryNotFound { name })
}
