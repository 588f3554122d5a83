//! File intake & validation for admin uploads.
//!
//! Batches are processed sequentially and each file is accepted or rejected
//! on its own: wrong MIME type, oversized decoded payload, or an
//! undecodable base64 string skip that file with a caller-visible reason,
//! never the whole batch.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::{
    error::ValidationError,
    file::{FileMime, FileOrigin, UploadedFile},
};

/// Maximum decoded size of a single knowledge-base file (2 MB).
pub const MAX_FILE_BYTES: usize = 2 * 1024 * 1024;

/// An incoming file as submitted by the admin surface.
#[derive(Debug, Clone)]
pub struct IncomingFile {
    pub name: String,
    /// Raw MIME string as declared by the uploader.
    pub mime: String,
    /// Base64 payload.
    pub data: String,
}

/// Outcome of validating one file from a batch.
#[derive(Debug)]
pub enum IntakeOutcome {
    Accepted(UploadedFile),
    Rejected {
        name: String,
        reason: ValidationError,
    },
}

/// Validates a batch in submission order.
pub fn intake_files(batch: Vec<IncomingFile>) -> Vec<IntakeOutcome> {
    batch.into_iter().map(intake_one).collect()
}

fn intake_one(file: IncomingFile) -> IntakeOutcome {
    match validate(&file) {
        Ok(mime) => IntakeOutcome::Accepted(UploadedFile {
            id: services::new_file_id(),
            name: file.name,
            mime,
            data: file.data,
            origin: FileOrigin::Manual,
        }),
        Err(reason) => IntakeOutcome::Rejected {
            name: file.name,
            reason,
        },
    }
}

fn validate(file: &IncomingFile) -> Result<FileMime, ValidationError> {
    let mime = FileMime::parse(&file.mime).ok_or_else(|| ValidationError::UnsupportedType {
        mime: file.mime.clone(),
    })?;

    let decoded = BASE64
        .decode(file.data.as_bytes())
        .map_err(|e| ValidationError::InvalidPayload(e.to_string()))?;

    if decoded.len() > MAX_FILE_BYTES {
        return Err(ValidationError::TooLarge {
            size: decoded.len(),
            limit: MAX_FILE_BYTES,
        });
    }

    Ok(mime)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn b64(bytes: &[u8]) -> String {
        BASE64.encode(bytes)
    }

    #[test]
    fn oversized_file_is_rejected_and_valid_one_kept() {
        let batch = vec![
            IncomingFile {
                name: "big.txt".into(),
                mime: "text/plain".into(),
                data: b64(&vec![0u8; MAX_FILE_BYTES + 1]),
            },
            IncomingFile {
                name: "ok.txt".into(),
                mime: "text/plain".into(),
                data: b64(b"mevzuat metni"),
            },
        ];

        let outcomes = intake_files(batch);
        assert_eq!(outcomes.len(), 2);
        assert!(matches!(
            outcomes[0],
            IntakeOutcome::Rejected {
                reason: ValidationError::TooLarge { .. },
                ..
            }
        ));
        match &outcomes[1] {
            IntakeOutcome::Accepted(f) => {
                assert_eq!(f.name, "ok.txt");
                assert_eq!(f.mime, FileMime::PlainText);
                assert_eq!(f.origin, FileOrigin::Manual);
                assert!(!f.id.is_empty());
            }
            other => panic!("expected accepted file, got {other:?}"),
        }
    }

    #[test]
    fn unsupported_mime_is_rejected() {
        let outcomes = intake_files(vec![IncomingFile {
            name: "doc.docx".into(),
            mime: "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
                .into(),
            data: b64(b"whatever"),
        }]);
        assert!(matches!(
            outcomes[0],
            IntakeOutcome::Rejected {
                reason: ValidationError::UnsupportedType { .. },
                ..
            }
        ));
    }

    #[test]
    fn undecodable_payload_is_rejected_not_fatal() {
        let outcomes = intake_files(vec![
            IncomingFile {
                name: "broken.pdf".into(),
                mime: "application/pdf".into(),
                data: "this is not base64!!".into(),
            },
            IncomingFile {
                name: "fine.pdf".into(),
                mime: "application/pdf".into(),
                data: b64(b"%PDF-1.4"),
            },
        ]);
        assert!(matches!(
            outcomes[0],
            IntakeOutcome::Rejected {
                reason: ValidationError::InvalidPayload(_),
                ..
            }
        ));
        assert!(matches!(outcomes[1], IntakeOutcome::Accepted(_)));
    }

    #[test]
    fn exactly_two_megabytes_is_accepted() {
        let outcomes = intake_files(vec![IncomingFile {
            name: "edge.txt".into(),
            mime: "text/plain".into(),
            data: b64(&vec![0u8; MAX_FILE_BYTES]),
        }]);
        assert!(matches!(outcomes[0], IntakeOutcome::Accepted(_)));
    }
}
