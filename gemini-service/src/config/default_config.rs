//! Default Gemini config loaded strictly from environment variables.
//!
//! # Environment variables
//!
//! - `GEMINI_API_KEY` = API key (mandatory)
//! - `GEMINI_MODEL`   = model id (default `gemini-2.5-flash`)
//! - `GEMINI_URL`     = API base (default `https://generativelanguage.googleapis.com`)
//! - `GEMINI_TIMEOUT_SECS` = optional request timeout (u64)
//!
//! Generation parameters are fixed, not configurable: the assistant always
//! answers with low temperature and a bounded output length.

use crate::{
    config::gemini_model_config::GeminiModelConfig,
    error_handler::{GeminiError, env_opt_u64, env_or, must_env, validate_http_endpoint},
};

/// Fixed sampling temperature for citizen-facing answers.
pub const TEMPERATURE: f32 = 0.1;

/// Fixed cap on generated output tokens.
pub const MAX_OUTPUT_TOKENS: u32 = 2000;

const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";

/// Constructs the service config from the environment.
///
/// # Errors
/// - [`ConfigError::MissingVar`](crate::error_handler::ConfigError) if
///   `GEMINI_API_KEY` is absent
/// - [`ConfigError::InvalidFormat`](crate::error_handler::ConfigError) if
///   `GEMINI_URL` has no HTTP scheme
/// - [`ConfigError::InvalidNumber`](crate::error_handler::ConfigError) if
///   `GEMINI_TIMEOUT_SECS` is not a valid `u64`
pub fn config_from_env() -> Result<GeminiModelConfig, GeminiError> {
    let api_key = must_env("GEMINI_API_KEY")?;
    let model = env_or("GEMINI_MODEL", DEFAULT_MODEL);
    let endpoint = env_or("GEMINI_URL", DEFAULT_ENDPOINT);
    validate_http_endpoint("GEMINI_URL", &endpoint)?;
    let timeout_secs = env_opt_u64("GEMINI_TIMEOUT_SECS")?;

    Ok(GeminiModelConfig {
        model,
        endpoint,
        api_key: Some(api_key),
        max_output_tokens: Some(MAX_OUTPUT_TOKENS),
        temperature: Some(TEMPERATURE),
        timeout_secs,
    })
}
