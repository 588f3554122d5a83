//! Best-effort chat logging.
//!
//! Every appended message (greeting, user, model, fallback alike) becomes
//! one [`ChatLog`] record. Records go to the configured remote endpoint
//! when there is one, otherwise to an append-only JSON array under a fixed
//! key in the key-value store. Logging never fails outward and never
//! blocks the chat flow.

mod record;

pub use record::{
    ChatLog, DeviceType, LogMetadata, LogTurn, device_type_from_user_agent,
    platform_from_user_agent,
};

use std::sync::Arc;

use chrono::{DateTime, Utc};
use state_store::KeyValueStore;
use thiserror::Error;
use tracing::{debug, warn};

/// Fixed storage key for the local append-only log list.
pub const CHAT_LOGS_KEY: &str = "chat_logs";

/// Internal sink failures. Callers never see these; they surface only as
/// warn-level log lines.
#[derive(Debug, Error)]
enum LogError {
    #[error("storage: {0}")]
    Storage(#[from] std::io::Error),

    #[error("serialization: {0}")]
    Json(#[from] serde_json::Error),

    #[error("remote sink: {0}")]
    Remote(#[from] reqwest::Error),

    #[error("remote sink returned HTTP {0}")]
    RemoteStatus(reqwest::StatusCode),
}

pub struct ChatLogger {
    store: Arc<dyn KeyValueStore>,
    client: reqwest::Client,
    remote_endpoint: Option<String>,
    dev_mode: bool,
}

impl ChatLogger {
    /// `remote_endpoint` is the optional chat-log API; without one, records
    /// only go to the local store. `dev_mode` additionally logs each
    /// outgoing record at debug level.
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        remote_endpoint: Option<String>,
        dev_mode: bool,
    ) -> Self {
        Self {
            store,
            client: reqwest::Client::new(),
            remote_endpoint,
            dev_mode,
        }
    }

    /// Builds and writes one log record for an appended message.
    ///
    /// Failures are caught and logged at warn level; the chat flow never
    /// observes them.
    pub async fn log_message(
        &self,
        session_id: &str,
        user_agent: &str,
        role: &str,
        content: &str,
        timestamp: DateTime<Utc>,
    ) {
        let record = ChatLog {
            session_id: session_id.to_string(),
            user_agent: user_agent.to_string(),
            conversation: vec![LogTurn {
                role: role.to_string(),
                content: content.to_string(),
                timestamp,
            }],
            metadata: LogMetadata {
                device_type: device_type_from_user_agent(user_agent),
                platform: platform_from_user_agent(user_agent),
            },
        };

        if self.dev_mode {
            if let Ok(raw) = serde_json::to_string(&record) {
                debug!(record = %raw, "outgoing chat log record");
            }
        }

        if let Err(e) = self.write(&record).await {
            warn!(session_id, error = %e, "chat log write failed");
        }
    }

    async fn write(&self, record: &ChatLog) -> Result<(), LogError> {
        if let Some(endpoint) = &self.remote_endpoint {
            match self.post_remote(endpoint, record).await {
                Ok(()) => return Ok(()),
                Err(e) => {
                    warn!(endpoint = %endpoint, error = %e, "remote log sink failed, falling back to local store");
                }
            }
        }
        self.append_local(record)
    }

    async fn post_remote(&self, endpoint: &str, record: &ChatLog) -> Result<(), LogError> {
        let resp = self.client.post(endpoint).json(record).send().await?;
        if !resp.status().is_success() {
            return Err(LogError::RemoteStatus(resp.status()));
        }
        Ok(())
    }

    /// Appends to the JSON array under [`CHAT_LOGS_KEY`]. A corrupt stored
    /// list is replaced with a fresh one rather than failing.
    fn append_local(&self, record: &ChatLog) -> Result<(), LogError> {
        let mut logs: Vec<ChatLog> = match self.store.get(CHAT_LOGS_KEY)? {
            Some(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!(key = CHAT_LOGS_KEY, error = %e, "corrupt chat log list, starting fresh");
                Vec::new()
            }),
            None => Vec::new(),
        };
        logs.push(record.clone());
        self.store.set(CHAT_LOGS_KEY, &serde_json::to_string(&logs)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use state_store::MemoryStore;
    use std::io;

    fn stored_logs(store: &MemoryStore) -> Vec<ChatLog> {
        match store.get(CHAT_LOGS_KEY).unwrap() {
            Some(raw) => serde_json::from_str(&raw).unwrap(),
            None => Vec::new(),
        }
    }

    #[tokio::test]
    async fn appends_one_record_per_message() {
        let store = Arc::new(MemoryStore::new());
        let logger = ChatLogger::new(store.clone(), None, false);

        let ua = "Mozilla/5.0 (Windows NT 10.0; Win64; x64)";
        logger
            .log_message("sess_1", ua, "user", "merhaba", Utc::now())
            .await;
        logger
            .log_message("sess_1", ua, "model", "buyrun", Utc::now())
            .await;

        let logs = stored_logs(&store);
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].session_id, "sess_1");
        assert_eq!(logs[0].conversation.len(), 1);
        assert_eq!(logs[0].conversation[0].role, "user");
        assert_eq!(logs[1].conversation[0].role, "model");
        assert_eq!(logs[0].metadata.device_type, DeviceType::Desktop);
        assert_eq!(logs[0].metadata.platform, "Windows");
    }

    #[tokio::test]
    async fn corrupt_log_list_is_replaced_not_fatal() {
        let store = Arc::new(MemoryStore::new());
        store.set(CHAT_LOGS_KEY, "][broken").unwrap();

        let logger = ChatLogger::new(store.clone(), None, false);
        logger
            .log_message("sess_1", "ua", "user", "soru", Utc::now())
            .await;

        assert_eq!(stored_logs(&store).len(), 1);
    }

    struct FailingStore;

    impl KeyValueStore for FailingStore {
        fn get(&self, _key: &str) -> io::Result<Option<String>> {
            Err(io::Error::other("disk gone"))
        }
        fn set(&self, _key: &str, _value: &str) -> io::Result<()> {
            Err(io::Error::other("disk gone"))
        }
    }

    #[tokio::test]
    async fn sink_failure_is_swallowed() {
        let logger = ChatLogger::new(Arc::new(FailingStore), None, false);
        // Must not panic or propagate.
        logger
            .log_message("sess_1", "ua", "user", "soru", Utc::now())
            .await;
    }
}
