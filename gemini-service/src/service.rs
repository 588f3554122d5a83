//! Gemini `generateContent` service.
//!
//! Minimal, non-streaming client around the Gemini REST API. The endpoint
//! is derived from `GeminiModelConfig::endpoint`:
//! - POST {endpoint}/v1beta/models/{model}:generateContent
//!
//! Constructor validation:
//! - `cfg.api_key` must be present
//! - `cfg.endpoint` must start with http:// or https://
//!
//! Errors are normalized via the unified error types in `error_handler`.

use std::time::{Duration, Instant};

use reqwest::header;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::{
    config::gemini_model_config::GeminiModelConfig,
    error_handler::{GeminiError, ProviderError, ProviderErrorKind, make_snippet},
    grounding::{self, GroundingChunk, GroundingSource},
    parts::Content,
};

/// Result of one completion call.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    /// Generated text; `None` when the model returned no usable text parts.
    pub text: Option<String>,
    /// Citations that survived the allow-list filter, in provider order.
    pub sources: Vec<GroundingSource>,
}

/// Thin client for the Gemini API.
///
/// Constructed from a complete [`GeminiModelConfig`]. Internally keeps a
/// preconfigured `reqwest::Client` (with timeout and default headers).
#[derive(Debug)]
pub struct GeminiService {
    client: reqwest::Client,
    cfg: GeminiModelConfig,
    url_generate: String,
}

impl GeminiService {
    /// Creates a new [`GeminiService`] from the given config.
    ///
    /// Validates the API key and endpoint scheme, then builds an HTTP
    /// client with default headers and a configurable timeout.
    ///
    /// # Errors
    /// - [`GeminiError::Provider`] with `MissingApiKey` if `cfg.api_key` is `None`
    /// - [`GeminiError::Provider`] with `InvalidEndpoint` if `cfg.endpoint` is invalid
    /// - [`GeminiError::HttpTransport`] if the HTTP client cannot be built
    pub fn new(cfg: GeminiModelConfig) -> Result<Self, GeminiError> {
        // 1) API key must be present.
        let api_key = cfg
            .api_key
            .clone()
            .ok_or_else(|| ProviderError::new(ProviderErrorKind::MissingApiKey))?;

        // 2) Endpoint must use http/https.
        let endpoint = cfg.endpoint.trim();
        if endpoint.is_empty()
            || !(endpoint.starts_with("http://") || endpoint.starts_with("https://"))
        {
            return Err(ProviderError::new(ProviderErrorKind::InvalidEndpoint(
                cfg.endpoint.clone(),
            ))
            .into());
        }

        // 3) HTTP client: timeout + default headers.
        let timeout = cfg
            .timeout_secs
            .map(Duration::from_secs)
            .unwrap_or_else(|| Duration::from_secs(60));

        let mut headers = header::HeaderMap::new();
        headers.insert(
            "x-goog-api-key",
            header::HeaderValue::from_str(&api_key).map_err(|e| {
                ProviderError::new(ProviderErrorKind::Decode(format!(
                    "invalid API key header: {e}"
                )))
            })?,
        );
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        let base = endpoint.trim_end_matches('/').to_string();
        let url_generate = format!("{}/v1beta/models/{}:generateContent", base, cfg.model);

        info!(
            model = %cfg.model,
            endpoint = %cfg.endpoint,
            timeout_secs = cfg.timeout_secs.unwrap_or(60),
            "GeminiService initialized"
        );

        Ok(Self {
            client,
            cfg,
            url_generate,
        })
    }

    /// Performs a **non-streaming** `generateContent` request.
    ///
    /// `contents` carries the role-tagged history plus the current turn;
    /// `system` is the fixed system instruction. Every request ships the
    /// fixed generation config, the four safety settings, and the
    /// Google-search grounding tool.
    ///
    /// # Errors
    /// - [`GeminiError::Provider`] with `HttpStatus` for non-2xx responses
    /// - [`GeminiError::HttpTransport`] for client/network failures
    /// - [`GeminiError::Provider`] with `Decode` if the JSON cannot be parsed
    pub async fn generate(
        &self,
        contents: &[Content],
        system: &str,
    ) -> Result<Completion, GeminiError> {
        let started = Instant::now();
        let body = GenerateContentRequest::new(contents, system, &self.cfg);

        debug!(
            model = %self.cfg.model,
            turns = contents.len(),
            "POST {}", self.url_generate
        );

        let resp = self
            .client
            .post(&self.url_generate)
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let url = self.url_generate.clone();
            let text = resp.text().await.unwrap_or_default();
            let snippet = make_snippet(&text);

            error!(
                %status,
                %url,
                %snippet,
                model = %self.cfg.model,
                latency_ms = started.elapsed().as_millis(),
                "generateContent returned non-success status"
            );

            return Err(ProviderError::new(ProviderErrorKind::HttpStatus {
                status,
                url,
                snippet,
            })
            .into());
        }

        let out: GenerateContentResponse = match resp.json().await {
            Ok(v) => v,
            Err(e) => {
                error!(
                    error = %e,
                    model = %self.cfg.model,
                    latency_ms = started.elapsed().as_millis(),
                    "failed to decode generateContent response"
                );
                return Err(ProviderError::new(ProviderErrorKind::Decode(format!(
                    "serde error: {e}; expected `candidates[0].content.parts`"
                )))
                .into());
            }
        };

        let (text, sources) = match out.candidates.into_iter().next() {
            Some(candidate) => {
                let text = candidate
                    .content
                    .map(|content| {
                        content
                            .parts
                            .into_iter()
                            .filter_map(|p| p.text)
                            .collect::<Vec<_>>()
                            .join("")
                    })
                    .filter(|t| !t.trim().is_empty());
                let sources = candidate
                    .grounding_metadata
                    .map(|m| grounding::filter_sources(&m.grounding_chunks))
                    .unwrap_or_default();
                (text, sources)
            }
            None => (None, Vec::new()),
        };

        info!(
            model = %self.cfg.model,
            latency_ms = started.elapsed().as_millis(),
            has_text = text.is_some(),
            source_count = sources.len(),
            "generateContent completed"
        );

        Ok(Completion { text, sources })
    }
}

/* ===========================================================================
HTTP payloads
======================================================================== */

/// Request body for `generateContent` (non-streaming).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: &'a [Content],
    system_instruction: SystemInstruction<'a>,
    tools: [Tool; 1],
    generation_config: GenerationConfig,
    safety_settings: [SafetySetting; 4],
}

impl<'a> GenerateContentRequest<'a> {
    fn new(contents: &'a [Content], system: &'a str, cfg: &GeminiModelConfig) -> Self {
        Self {
            contents,
            system_instruction: SystemInstruction {
                parts: [SystemPart { text: system }],
            },
            tools: [Tool {
                google_search: GoogleSearch {},
            }],
            generation_config: GenerationConfig {
                temperature: cfg.temperature,
                max_output_tokens: cfg.max_output_tokens,
            },
            safety_settings: default_safety_settings(),
        }
    }
}

#[derive(Debug, Serialize)]
struct SystemInstruction<'a> {
    parts: [SystemPart<'a>; 1],
}

#[derive(Debug, Serialize)]
struct SystemPart<'a> {
    text: &'a str,
}

/// Enables the web-search grounding capability on the call.
#[derive(Debug, Serialize)]
struct Tool {
    #[serde(rename = "googleSearch")]
    google_search: GoogleSearch,
}

#[derive(Debug, Serialize)]
struct GoogleSearch {}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

/// One per-category harm threshold, sent with every request.
#[derive(Debug, Serialize)]
struct SafetySetting {
    category: &'static str,
    threshold: &'static str,
}

const BLOCK_LOW_AND_ABOVE: &str = "BLOCK_LOW_AND_ABOVE";

fn default_safety_settings() -> [SafetySetting; 4] {
    [
        "HARM_CATEGORY_HATE_SPEECH",
        "HARM_CATEGORY_DANGEROUS_CONTENT",
        "HARM_CATEGORY_SEXUALLY_EXPLICIT",
        "HARM_CATEGORY_HARASSMENT",
    ]
    .map(|category| SafetySetting {
        category,
        threshold: BLOCK_LOW_AND_ABOVE,
    })
}

/// Minimal response for `generateContent`.
#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroundingMetadata {
    #[serde(default)]
    grounding_chunks: Vec<GroundingChunk>,
}
