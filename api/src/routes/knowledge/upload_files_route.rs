//! POST /knowledge/files — admin batch upload into the knowledge base.
//!
//! Files are validated sequentially; a rejected file is reported in the
//! results and never aborts the rest of the batch.

use std::sync::Arc;

use axum::{Json, extract::State, http::HeaderMap};

use state_store::{IncomingFile, IntakeOutcome, intake_files};

use crate::{
    core::app_state::AppState,
    error_handler::AppResult,
    routes::knowledge::{
        require_admin,
        upload_files_request::{FileOutcome, UploadFilesRequest, UploadFilesResponse},
    },
};

/// Handler: POST /knowledge/files
pub async fn upload_files(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<UploadFilesRequest>,
) -> AppResult<Json<UploadFilesResponse>> {
    require_admin(&state.admin_token, &headers)?;

    let batch: Vec<IncomingFile> = body.files.into_iter().map(Into::into).collect();

    let mut accepted = Vec::new();
    let results = intake_files(batch)
        .into_iter()
        .map(|outcome| match outcome {
            IntakeOutcome::Accepted(file) => {
                let result = FileOutcome {
                    name: file.name.clone(),
                    accepted: true,
                    id: Some(file.id.clone()),
                    error: None,
                };
                accepted.push(file);
                result
            }
            IntakeOutcome::Rejected { name, reason } => FileOutcome {
                name,
                accepted: false,
                id: None,
                error: Some(reason.to_string()),
            },
        })
        .collect();

    state.knowledge.add_files(accepted);

    Ok(Json(UploadFilesResponse { results }))
}
