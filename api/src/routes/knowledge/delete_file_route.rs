//! DELETE /knowledge/files/{id} — explicit removal, persisted.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
};

use crate::{core::app_state::AppState, error_handler::AppResult, routes::knowledge::require_admin};

/// Handler: DELETE /knowledge/files/{id}
pub async fn delete_file(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> AppResult<StatusCode> {
    require_admin(&state.admin_token, &headers)?;

    state.knowledge.remove_file(&id)?;

    Ok(StatusCode::NO_CONTENT)
}
