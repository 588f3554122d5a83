//! Explicit session context and the registry of live sessions.
//!
//! All per-session chat state lives in [`SessionContext`] and is passed to
//! the operations that need it; nothing is ambient. Counters are derived
//! from the transcript, so the rate limit can never drift from the history
//! it is based on.

use std::{collections::HashMap, sync::Arc};

use tokio::sync::{Mutex, RwLock};

use crate::message::{Message, Role};

/// Maximum characters of one user message; longer input is truncated.
pub const MAX_INPUT_CHARS: usize = 500;

/// Maximum user-authored messages per session. There is no reset besides
/// opening a new session.
pub const MAX_USER_MESSAGES: usize = 15;

/// Per-session state: the transcript plus metadata captured at creation.
pub struct SessionContext {
    pub id: String,
    pub user_agent: String,
    transcript: Vec<Message>,
}

impl SessionContext {
    pub fn new(id: String, user_agent: String) -> Self {
        Self {
            id,
            user_agent,
            transcript: Vec::new(),
        }
    }

    /// Appends a message. The transcript is append-only.
    pub fn push(&mut self, message: Message) {
        self.transcript.push(message);
    }

    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    /// Count of user-authored messages, derived on demand.
    pub fn user_message_count(&self) -> usize {
        self.transcript
            .iter()
            .filter(|m| m.role == Role::User)
            .count()
    }

    /// Sends are rejected once the limit is reached; the transcript itself
    /// stays readable.
    pub fn limit_reached(&self) -> bool {
        self.user_message_count() >= MAX_USER_MESSAGES
    }

    pub fn remaining_messages(&self) -> usize {
        MAX_USER_MESSAGES.saturating_sub(self.user_message_count())
    }
}

/// Live sessions, keyed by id.
///
/// Each session sits behind its own async mutex; holding that lock across
/// the provider call is what enforces one in-flight send per session.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<String, Arc<Mutex<SessionContext>>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, ctx: SessionContext) -> Arc<Mutex<SessionContext>> {
        let id = ctx.id.clone();
        let handle = Arc::new(Mutex::new(ctx));
        self.sessions.write().await.insert(id, handle.clone());
        handle
    }

    pub async fn get(&self, id: &str) -> Option<Arc<Mutex<SessionContext>>> {
        self.sessions.read().await.get(id).cloned()
    }
}

/// Trims raw user input and truncates it to [`MAX_INPUT_CHARS`] characters
/// on a character boundary.
pub fn sanitize_input(raw: &str) -> String {
    let trimmed = raw.trim();
    match trimmed.char_indices().nth(MAX_INPUT_CHARS) {
        Some((byte_idx, _)) => trimmed[..byte_idx].to_string(),
        None => trimmed.to_string(),
    }
}
