//! HTTP surface for the citizen-assistant backend.
//!
//! Routes: session creation, the chat send/transcript pair, and the
//! admin-guarded knowledge-base management. All wiring (key-value store,
//! knowledge base, logger, Gemini client, chat engine) happens in
//! [`start`].

mod core;
mod error_handler;
mod routes;

pub use error_handler::{AppError, AppResult};

use std::sync::Arc;

use axum::{
    Router,
    routing::{delete, get, post},
};
use tokio::signal;
use tracing::info;

use chat_core::ChatEngine;
use chat_logger::ChatLogger;
use gemini_service::{GeminiService, config_from_env};
use state_store::{JsonFileStore, KeyValueStore, KnowledgeStore, load_provisioned_files};

use crate::core::app_state::{AppConfig, AppState};
use crate::routes::{
    chat::{send_message_route::send_message, transcript_route::get_transcript},
    knowledge::{
        delete_file_route::delete_file, list_files_route::list_files,
        upload_files_route::upload_files,
    },
    session::create_session_route::create_session,
};

pub async fn start() -> Result<(), AppError> {
    let cfg = AppConfig::from_env()?;

    let store: Arc<dyn KeyValueStore> = Arc::new(
        JsonFileStore::open(&cfg.data_dir)
            .map_err(|e| AppError::Startup(format!("cannot open data directory: {e}")))?,
    );

    let knowledge = Arc::new(KnowledgeStore::load(store.clone()));
    let provisioned = load_provisioned_files(&cfg.assets_dir, &cfg.bootstrap_files).await;
    knowledge.merge_provisioned(provisioned);

    let logger = Arc::new(ChatLogger::new(
        store,
        cfg.chat_log_endpoint.clone(),
        cfg.dev_mode,
    ));

    let gemini = GeminiService::new(config_from_env()?)?;
    let engine = ChatEngine::new(gemini, knowledge.clone(), logger);

    let state = Arc::new(AppState {
        engine,
        knowledge,
        admin_token: cfg.admin_token,
    });

    let app = Router::new()
        .route("/session", post(create_session))
        .route("/chat/send", post(send_message))
        .route("/chat/transcript/{session_id}", get(get_transcript))
        .route("/knowledge/files", post(upload_files).get(list_files))
        .route("/knowledge/files/{id}", delete(delete_file))
        .with_state(state);

    // Bind to address
    let listener = tokio::net::TcpListener::bind(&cfg.api_address)
        .await
        .map_err(AppError::Bind)?;
    info!(address = %cfg.api_address, "citizen-assistant API listening");

    // Start server with graceful shutdown on Ctrl+C
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    Ok(())
}

/// Returns a future that resolves when Ctrl+C is pressed
async fn shutdown_signal() {
    // Wait for the Ctrl+C signal
    signal::ctrl_c()
        .await
        .expect("Failed to listen for shutdown signal");
}
