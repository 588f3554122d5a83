//! GET /chat/transcript/{session_id} — full history, readable even after
//! the session spent its message allowance.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;

use chat_core::Message;

use crate::{core::app_state::AppState, error_handler::AppResult};

/// Response payload for /chat/transcript/{session_id}.
#[derive(Debug, Serialize)]
pub struct TranscriptResponse {
    pub session_id: String,
    pub messages: Vec<Message>,
    /// True once the session can no longer send.
    pub limit_reached: bool,
}

/// Handler: GET /chat/transcript/{session_id}
pub async fn get_transcript(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> AppResult<Json<TranscriptResponse>> {
    let (messages, limit_reached) = state.engine.transcript(&session_id).await?;

    Ok(Json(TranscriptResponse {
        session_id,
        messages,
        limit_reached,
    }))
}
