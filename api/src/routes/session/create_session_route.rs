//! POST /session — opens a chat session seeded with the greeting.

use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, header},
};
use serde::Serialize;

use chat_core::{MAX_USER_MESSAGES, Message};

use crate::core::app_state::AppState;

/// Response payload for /session.
#[derive(Debug, Serialize)]
pub struct CreateSessionResponse {
    pub session_id: String,
    /// The assistant greeting already present in the transcript.
    pub greeting: Message,
    /// User messages the session may still send.
    pub remaining_messages: usize,
}

/// Handler: POST /session
pub async fn create_session(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Json<CreateSessionResponse> {
    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    let (session_id, greeting) = state.engine.open_session(&user_agent).await;

    Json(CreateSessionResponse {
        session_id,
        greeting,
        remaining_messages: MAX_USER_MESSAGES,
    })
}
