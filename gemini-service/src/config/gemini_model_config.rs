/// Configuration for a Gemini `generateContent` invocation.
///
/// # Fields
///
/// - `model`: model identifier (e.g., `"gemini-2.5-flash"`).
/// - `endpoint`: API base URL.
/// - `api_key`: key sent via the `x-goog-api-key` header.
/// - `max_output_tokens`: cap on generated length.
/// - `temperature`: sampling temperature; the assistant runs low for
///   consistent, official-register answers.
/// - `timeout_secs`: optional request timeout in seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct GeminiModelConfig {
    /// Model identifier string.
    pub model: String,

    /// API base URL (no trailing path).
    pub endpoint: String,

    /// API key for authentication.
    pub api_key: Option<String>,

    /// Maximum number of tokens to generate.
    pub max_output_tokens: Option<u32>,

    /// Sampling temperature.
    pub temperature: Option<f32>,

    /// Optional request timeout (in seconds).
    pub timeout_secs: Option<u64>,
}
