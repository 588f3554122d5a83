//! GET /knowledge/files — admin metadata listing (payloads omitted).

use std::sync::Arc;

use axum::{Json, extract::State, http::HeaderMap};
use serde::Serialize;

use crate::{core::app_state::AppState, error_handler::AppResult, routes::knowledge::require_admin};

/// Response payload for GET /knowledge/files.
#[derive(Debug, Serialize)]
pub struct ListFilesResponse {
    pub files: Vec<FileSummary>,
}

#[derive(Debug, Serialize)]
pub struct FileSummary {
    pub id: String,
    pub name: String,
    pub mime: &'static str,
}

/// Handler: GET /knowledge/files
pub async fn list_files(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> AppResult<Json<ListFilesResponse>> {
    require_admin(&state.admin_token, &headers)?;

    let files = state
        .knowledge
        .manual_files()
        .into_iter()
        .map(|f| FileSummary {
            id: f.id,
            name: f.name,
            mime: f.mime.as_str(),
        })
        .collect();

    Ok(Json(ListFilesResponse { files }))
}
