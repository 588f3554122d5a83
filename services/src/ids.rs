use chrono::Utc;
use uuid::Uuid;

/// Session id from random + timestamp entropy.
///
/// Uniqueness is best-effort: ids only key in-memory sessions and correlate
/// log records, so no collision guarantees are needed.
pub fn new_session_id() -> String {
    format!(
        "sess_{}_{}",
        Uuid::new_v4().simple(),
        Utc::now().timestamp_millis()
    )
}

/// Random id for a transcript message.
pub fn new_message_id() -> String {
    Uuid::new_v4().to_string()
}

/// Random id for a knowledge-base file.
pub fn new_file_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_ids_are_prefixed_and_distinct() {
        let a = new_session_id();
        let b = new_session_id();
        assert!(a.starts_with("sess_"));
        assert_ne!(a, b);
    }
}
