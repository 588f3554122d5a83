use serde::{Deserialize, Serialize};
use state_store::IncomingFile;

/// Request payload for POST /knowledge/files.
#[derive(Debug, Deserialize)]
pub struct UploadFilesRequest {
    pub files: Vec<FileUpload>,
}

/// One file in the upload batch.
#[derive(Debug, Deserialize)]
pub struct FileUpload {
    pub name: String,
    /// Declared MIME type; only PDF and plain text are accepted.
    pub mime: String,
    /// Base64 payload.
    pub data: String,
}

impl From<FileUpload> for IncomingFile {
    fn from(f: FileUpload) -> Self {
        IncomingFile {
            name: f.name,
            mime: f.mime,
            data: f.data,
        }
    }
}

/// Response payload: one outcome per submitted file, in submission order.
#[derive(Debug, Serialize)]
pub struct UploadFilesResponse {
    pub results: Vec<FileOutcome>,
}

#[derive(Debug, Serialize)]
pub struct FileOutcome {
    pub name: String,
    pub accepted: bool,
    /// Id of the stored file, for accepted entries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Rejection reason for files that were skipped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
