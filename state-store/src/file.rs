use serde::{Deserialize, Serialize};

/// MIME types allowed into the knowledge base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileMime {
    #[serde(rename = "application/pdf")]
    Pdf,
    #[serde(rename = "text/plain")]
    PlainText,
}

impl FileMime {
    /// Parses a MIME string, returning `None` for anything not allowed.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "application/pdf" => Some(Self::Pdf),
            "text/plain" => Some(Self::PlainText),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::PlainText => "text/plain",
        }
    }
}

/// Where a knowledge-base file came from.
///
/// Only `Manual` files are persisted. `Provisioned` files are re-read from
/// the assets directory on every start.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileOrigin {
    #[default]
    Manual,
    Provisioned,
}

/// A reference document made available to the completion call as inline
/// context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    pub id: String,
    pub name: String,
    pub mime: FileMime,
    /// Base64 payload, inlined into provider requests as binary data.
    pub data: String,
    #[serde(default)]
    pub origin: FileOrigin,
}
