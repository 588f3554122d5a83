//! The knowledge base: an in-memory file list backed by a [`KeyValueStore`].
//!
//! The in-memory list is authoritative for the running process. Persistence
//! is best-effort: a failed write logs a warning and the session continues
//! with the unsaved state, matching the quota-exhaustion behavior of the
//! storage this replaces.

use std::sync::{Arc, Mutex};

use tracing::{info, warn};

use crate::{
    error::StateStoreError,
    file::{FileOrigin, UploadedFile},
    kv::KeyValueStore,
};

/// Fixed storage key for manually uploaded files.
pub const KNOWLEDGE_FILES_KEY: &str = "knowledge_files";

pub struct KnowledgeStore {
    store: Arc<dyn KeyValueStore>,
    files: Mutex<Vec<UploadedFile>>,
}

impl KnowledgeStore {
    /// Loads the persisted manual file list from `store`.
    ///
    /// Missing or corrupt data is non-fatal and yields an empty knowledge
    /// base.
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let files = match store.get(KNOWLEDGE_FILES_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<UploadedFile>>(&raw) {
                Ok(list) => {
                    info!(count = list.len(), "loaded persisted knowledge files");
                    list
                }
                Err(e) => {
                    warn!(key = KNOWLEDGE_FILES_KEY, error = %e, "corrupt knowledge-file list, starting empty");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(key = KNOWLEDGE_FILES_KEY, error = %e, "could not read knowledge-file list, starting empty");
                Vec::new()
            }
        };

        Self {
            store,
            files: Mutex::new(files),
        }
    }

    /// Appends accepted uploads and persists the manual subset.
    pub fn add_files(&self, accepted: Vec<UploadedFile>) {
        if accepted.is_empty() {
            return;
        }
        let mut files = self.files.lock().unwrap();
        files.extend(accepted);
        self.persist(&files);
    }

    /// Merges bootstrap files into the in-memory list without persisting
    /// them.
    pub fn merge_provisioned(&self, provisioned: Vec<UploadedFile>) {
        if provisioned.is_empty() {
            return;
        }
        let mut files = self.files.lock().unwrap();
        files.extend(provisioned);
    }

    /// Removes one file by id and persists the change.
    ///
    /// # Errors
    /// [`StateStoreError::UnknownFile`] when no file has that id.
    pub fn remove_file(&self, id: &str) -> Result<(), StateStoreError> {
        let mut files = self.files.lock().unwrap();
        let before = files.len();
        files.retain(|f| f.id != id);
        if files.len() == before {
            return Err(StateStoreError::UnknownFile(id.to_string()));
        }
        self.persist(&files);
        Ok(())
    }

    /// Snapshot of the combined knowledge base (manual + provisioned) in
    /// insertion order, for prompt assembly.
    pub fn snapshot(&self) -> Vec<UploadedFile> {
        self.files.lock().unwrap().clone()
    }

    /// Snapshot of manually uploaded files only, for the admin surface.
    pub fn manual_files(&self) -> Vec<UploadedFile> {
        self.files
            .lock()
            .unwrap()
            .iter()
            .filter(|f| f.origin == FileOrigin::Manual)
            .cloned()
            .collect()
    }

    /// Best-effort write of the manual subset under the fixed key.
    fn persist(&self, files: &[UploadedFile]) {
        let manual: Vec<&UploadedFile> = files
            .iter()
            .filter(|f| f.origin == FileOrigin::Manual)
            .collect();

        let raw = match serde_json::to_string(&manual) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(key = KNOWLEDGE_FILES_KEY, error = %e, "could not serialize knowledge files");
                return;
            }
        };

        if let Err(e) = self.store.set(KNOWLEDGE_FILES_KEY, &raw) {
            warn!(
                key = KNOWLEDGE_FILES_KEY,
                error = %e,
                "persisting knowledge files failed; in-memory list stays authoritative"
            );
        }
    }
}
