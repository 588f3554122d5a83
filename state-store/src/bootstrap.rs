//! Pre-provisioned reference documents loaded from the static assets
//! directory at startup.

use std::path::Path;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use tracing::{info, warn};

use crate::file::{FileMime, FileOrigin, UploadedFile};

/// Reads `names` from `assets_dir` sequentially and converts each into an
/// inline attachment tagged [`FileOrigin::Provisioned`].
///
/// Missing or unreadable files are skipped with a warning; an empty result
/// is not an error.
pub async fn load_provisioned_files(assets_dir: &Path, names: &[String]) -> Vec<UploadedFile> {
    let mut out = Vec::with_capacity(names.len());

    for name in names {
        let Some(mime) = mime_from_name(name) else {
            warn!(file = %name, "skipping provisioned file with unsupported extension");
            continue;
        };

        let path = assets_dir.join(name);
        match tokio::fs::read(&path).await {
            Ok(bytes) => out.push(UploadedFile {
                id: services::new_file_id(),
                name: name.clone(),
                mime,
                data: BASE64.encode(bytes),
                origin: FileOrigin::Provisioned,
            }),
            Err(e) => {
                warn!(file = %path.display(), error = %e, "skipping unreadable provisioned file");
            }
        }
    }

    if !out.is_empty() {
        info!(count = out.len(), "provisioned knowledge files loaded");
    }
    out
}

fn mime_from_name(name: &str) -> Option<FileMime> {
    let lower = name.to_ascii_lowercase();
    if lower.ends_with(".pdf") {
        Some(FileMime::Pdf)
    } else if lower.ends_with(".txt") {
        Some(FileMime::PlainText)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_files_are_skipped_not_fatal() {
        let dir = std::env::temp_dir().join(format!("bootstrap-test-{}", std::process::id()));
        tokio::fs::create_dir_all(&dir).await.unwrap();
        tokio::fs::write(dir.join("mevzuat.txt"), b"kira yardimi")
            .await
            .unwrap();

        let names = vec![
            "mevzuat.txt".to_string(),
            "yok.pdf".to_string(),
            "resim.png".to_string(),
        ];
        let files = load_provisioned_files(&dir, &names).await;

        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name, "mevzuat.txt");
        assert_eq!(files[0].mime, FileMime::PlainText);
        assert_eq!(files[0].origin, FileOrigin::Provisioned);
        assert_eq!(files[0].data, BASE64.encode(b"kira yardimi"));

        let _ = tokio::fs::remove_dir_all(&dir).await;
    }
}
