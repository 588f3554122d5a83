//! POST /chat/send — one user turn through the assistant.

use std::sync::Arc;

use axum::{Json, extract::State};

use crate::{
    core::app_state::AppState,
    error_handler::AppResult,
    routes::chat::send_message_request::{SendMessageRequest, SendMessageResponse},
};

/// Handler: POST /chat/send
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:8080/chat/send \
///   -H 'content-type: application/json' \
///   -d '{"session_id":"sess_…","text":"Kentsel dönüşüm kira yardımı ne kadar?"}'
/// ```
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SendMessageRequest>,
) -> AppResult<Json<SendMessageResponse>> {
    let outcome = state
        .engine
        .send_message(&body.session_id, &body.text)
        .await?;

    Ok(Json(SendMessageResponse {
        message: outcome.reply,
        remaining_messages: outcome.remaining_messages,
    }))
}
