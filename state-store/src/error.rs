//! Typed errors for the state-store crate.
//!
//! Validation failures are per-file and reported back to the caller; storage
//! failures degrade (the in-memory state stays authoritative) and are mostly
//! logged rather than propagated.

use thiserror::Error;

/// Top-level error for persistent-state operations.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum StateStoreError {
    /// A file failed intake validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Delete referenced a file id that is not in the knowledge base.
    #[error("[State Store] no file with id {0}")]
    UnknownFile(String),
}

/// Per-file validation failures. One rejection never aborts a batch.
#[non_exhaustive]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Only PDF and plain text enter the knowledge base.
    #[error("unsupported file type {mime:?}; only PDF and plain-text files are accepted")]
    UnsupportedType { mime: String },

    /// Decoded payload exceeds the per-file size limit.
    #[error("file is too large ({size} bytes, limit {limit})")]
    TooLarge { size: usize, limit: usize },

    /// Payload was not decodable base64.
    #[error("payload is not valid base64: {0}")]
    InvalidPayload(String),
}
