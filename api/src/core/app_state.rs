use std::path::PathBuf;
use std::sync::Arc;

use chat_core::ChatEngine;
use gemini_service::GeminiService;
use state_store::KnowledgeStore;

use crate::error_handler::AppError;

/// Shared state for all HTTP handlers.
pub struct AppState {
    /// Chat orchestration over the live Gemini backend.
    pub engine: ChatEngine<GeminiService>,
    /// Knowledge-base handle for the admin routes.
    pub knowledge: Arc<KnowledgeStore>,
    /// Shared secret protecting the knowledge-base admin routes.
    pub admin_token: String,
}

/// Environment-driven settings collected once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Listen address, e.g. "127.0.0.1:8080".
    pub api_address: String,
    /// Shared secret expected in the admin token header.
    pub admin_token: String,
    /// Directory backing the key-value store.
    pub data_dir: PathBuf,
    /// Static assets directory for pre-provisioned documents.
    pub assets_dir: PathBuf,
    /// Comma-separated file names under the assets directory.
    pub bootstrap_files: Vec<String>,
    /// Optional remote chat-log endpoint.
    pub chat_log_endpoint: Option<String>,
    /// Development mode logs outgoing chat-log records at debug level.
    pub dev_mode: bool,
}

impl AppConfig {
    /// Loads settings from environment variables.
    ///
    /// # Errors
    /// [`AppError::MissingEnv`] when a required variable is absent or empty.
    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self {
            api_address: require("API_ADDRESS")?,
            admin_token: require("ADMIN_TOKEN")?,
            data_dir: env_or("DATA_DIR", "./data").into(),
            assets_dir: env_or("ASSETS_DIR", "./assets").into(),
            bootstrap_files: std::env::var("BOOTSTRAP_FILES")
                .map(|raw| {
                    raw.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            chat_log_endpoint: std::env::var("CHAT_LOG_ENDPOINT")
                .ok()
                .filter(|v| !v.trim().is_empty()),
            dev_mode: env_or("APP_ENV", "production") == "development",
        })
    }
}

fn require(name: &'static str) -> Result<String, AppError> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or(AppError::MissingEnv(name))
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}
