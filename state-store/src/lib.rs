//! Persistent state for the citizen assistant: a key-value adapter and the
//! knowledge base of reference documents built on top of it.
//!
//! The key-value surface mirrors the `{get(key), set(key, value)}` contract
//! of the browser storage this service replaces, so the backing store stays
//! swappable. The knowledge base keeps the in-memory file list authoritative
//! and treats persistence as best-effort.

mod bootstrap;
mod error;
mod file;
mod intake;
mod knowledge;
mod kv;

pub use bootstrap::load_provisioned_files;
pub use error::{StateStoreError, ValidationError};
pub use file::{FileMime, FileOrigin, UploadedFile};
pub use intake::{IncomingFile, IntakeOutcome, MAX_FILE_BYTES, intake_files};
pub use knowledge::{KNOWLEDGE_FILES_KEY, KnowledgeStore};
pub use kv::{JsonFileStore, KeyValueStore, MemoryStore};
