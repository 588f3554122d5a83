pub mod delete_file_route;
pub mod list_files_route;
pub mod upload_files_request;
pub mod upload_files_route;

use axum::http::HeaderMap;

use crate::error_handler::AppError;

/// Shared-secret header protecting the knowledge-base admin routes.
pub const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

/// Rejects callers whose token header does not match the configured secret.
pub(crate) fn require_admin(expected: &str, headers: &HeaderMap) -> Result<(), AppError> {
    let presented = headers
        .get(ADMIN_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    if presented.is_empty() || presented != expected {
        return Err(AppError::AdminToken);
    }
    Ok(())
}
