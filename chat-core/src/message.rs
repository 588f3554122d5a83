use chrono::{DateTime, Utc};
use gemini_service::GroundingSource;
use serde::Serialize;

/// Author of a transcript message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Model => "model",
        }
    }
}

/// One transcript entry. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    /// Set on fallback replies produced when the provider call failed.
    pub is_error: bool,
    pub sources: Vec<GroundingSource>,
}

impl Message {
    pub fn user(text: String) -> Self {
        Self {
            id: services::new_message_id(),
            role: Role::User,
            text,
            timestamp: Utc::now(),
            is_error: false,
            sources: Vec::new(),
        }
    }

    pub fn model(text: String, sources: Vec<GroundingSource>) -> Self {
        Self {
            id: services::new_message_id(),
            role: Role::Model,
            text,
            timestamp: Utc::now(),
            is_error: false,
            sources,
        }
    }

    /// Model-authored fallback reply for a failed provider call.
    pub fn fallback(text: String) -> Self {
        Self {
            id: services::new_message_id(),
            role: Role::Model,
            text,
            timestamp: Utc::now(),
            is_error: true,
            sources: Vec::new(),
        }
    }
}
