//! Client for the Gemini `generateContent` REST API.
//!
//! The service sends role-tagged contents (text and inline-binary parts)
//! with a fixed generation profile: low temperature, bounded output length,
//! the four harm categories blocked at low-and-above, and the Google-search
//! grounding tool enabled. Returned citations are filtered to an
//! allow-listed set of government host suffixes before they reach callers.

pub mod config;
pub mod error_handler;
pub mod grounding;
pub mod service;

mod parts;

pub use config::default_config::config_from_env;
pub use config::gemini_model_config::GeminiModelConfig;
pub use error_handler::{ConfigError, GeminiError, ProviderError, ProviderErrorKind};
pub use grounding::{ALLOWED_HOST_SUFFIXES, GroundingSource};
pub use parts::{Content, ContentRole, InlineData, Part};
pub use service::{Completion, GeminiService};
