use chat_core::Message;
use serde::{Deserialize, Serialize};

/// Request payload for /chat/send.
#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    /// Session created via POST /session.
    pub session_id: String,
    /// The citizen's question; trimmed and truncated server-side.
    pub text: String,
}

/// Response payload for /chat/send.
#[derive(Debug, Serialize)]
pub struct SendMessageResponse {
    /// The assistant reply (fixed fallback text on provider failure).
    pub message: Message,
    /// User messages the session may still send.
    pub remaining_messages: usize,
}
