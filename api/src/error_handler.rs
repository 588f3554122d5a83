use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chat_core::ChatError;
use serde::Serialize;
use state_store::StateStoreError;
use thiserror::Error;

/// Public application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // --- Boot / config ---
    #[error("missing required environment variable: {0}")]
    MissingEnv(&'static str),

    #[error("startup configuration error: {0}")]
    Startup(String),

    // --- IO / network / server ---
    #[error("failed to bind listener")]
    Bind(#[source] std::io::Error),

    #[error("server error")]
    Server(#[source] std::io::Error),

    // --- Request / routing ---
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("unknown session")]
    UnknownSession,

    #[error("a send is already in flight for this session")]
    SendPending,

    #[error("session message limit reached")]
    SessionLimit,

    #[error("admin token missing or invalid")]
    AdminToken,

    #[error("no such knowledge-base file")]
    UnknownFile,

    #[error("storage error: {0}")]
    Storage(String),
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            // startup-only
            AppError::MissingEnv(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Startup(_) => StatusCode::INTERNAL_SERVER_ERROR,

            // 4xx
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::AdminToken => StatusCode::UNAUTHORIZED,
            AppError::SessionLimit => StatusCode::FORBIDDEN,
            AppError::UnknownSession | AppError::UnknownFile => StatusCode::NOT_FOUND,
            AppError::SendPending => StatusCode::CONFLICT,

            // 5xx
            AppError::Bind(_) | AppError::Server(_) | AppError::Storage(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            AppError::MissingEnv(_) => "MISSING_ENV",
            AppError::Startup(_) => "STARTUP_ERROR",
            AppError::Bind(_) => "BIND_ERROR",
            AppError::Server(_) => "SERVER_ERROR",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::UnknownSession => "UNKNOWN_SESSION",
            AppError::SendPending => "SEND_PENDING",
            AppError::SessionLimit => "SESSION_LIMIT_REACHED",
            AppError::AdminToken => "ADMIN_TOKEN_INVALID",
            AppError::UnknownFile => "UNKNOWN_FILE",
            AppError::Storage(_) => "STORAGE_ERROR",
        }
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            error: self.error_code(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Handy result alias used across handlers.
pub type AppResult<T> = Result<T, AppError>;

impl From<ChatError> for AppError {
    fn from(err: ChatError) -> Self {
        match err {
            ChatError::UnknownSession(_) => AppError::UnknownSession,
            ChatError::SendPending => AppError::SendPending,
            ChatError::LimitReached(_) => AppError::SessionLimit,
            ChatError::EmptyInput => AppError::BadRequest(err.to_string()),
        }
    }
}

impl From<StateStoreError> for AppError {
    fn from(err: StateStoreError) -> Self {
        match err {
            StateStoreError::UnknownFile(_) => AppError::UnknownFile,
            other => AppError::Storage(other.to_string()),
        }
    }
}

/// Startup errors from the Gemini client (missing key, bad endpoint).
impl From<gemini_service::GeminiError> for AppError {
    fn from(err: gemini_service::GeminiError) -> Self {
        AppError::Startup(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_errors_map_to_expected_statuses() {
        let cases = [
            (
                AppError::from(ChatError::UnknownSession("sess_x".into())),
                StatusCode::NOT_FOUND,
            ),
            (AppError::from(ChatError::SendPending), StatusCode::CONFLICT),
            (
                AppError::from(ChatError::LimitReached(15)),
                StatusCode::FORBIDDEN,
            ),
            (
                AppError::from(ChatError::EmptyInput),
                StatusCode::BAD_REQUEST,
            ),
            (AppError::AdminToken, StatusCode::UNAUTHORIZED),
        ];
        for (err, expected) in cases {
            assert_eq!(err.status_code(), expected, "{err}");
        }
    }

    #[test]
    fn unknown_file_maps_to_not_found() {
        let err = AppError::from(StateStoreError::UnknownFile("f1".into()));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.error_code(), "UNKNOWN_FILE");
    }
}
