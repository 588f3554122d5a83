//! Grounding-source extraction and allow-list filtering.
//!
//! The assistant only ever surfaces official sources: a citation survives
//! when it has a non-empty title and a well-formed URI whose hostname ends
//! with one of [`ALLOWED_HOST_SUFFIXES`]. Everything else, including
//! malformed URIs, is dropped silently. Provider order is preserved.

use serde::{Deserialize, Serialize};
use url::Url;

/// Host suffixes a citation may carry.
pub const ALLOWED_HOST_SUFFIXES: [&str; 2] = [".gov.tr", ".bel.tr"];

/// A citation returned by the provider's web-search tool, attached to one
/// model response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundingSource {
    pub title: String,
    pub uri: String,
}

/// Wire shape of one grounding chunk in the response metadata.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct GroundingChunk {
    #[serde(default)]
    pub web: Option<WebSource>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct WebSource {
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

pub(crate) fn filter_sources(chunks: &[GroundingChunk]) -> Vec<GroundingSource> {
    chunks
        .iter()
        .filter_map(|chunk| {
            let web = chunk.web.as_ref()?;
            let uri = web.uri.as_deref()?.trim();
            let title = web.title.as_deref()?.trim();
            if uri.is_empty() || title.is_empty() || !host_is_allowed(uri) {
                return None;
            }
            Some(GroundingSource {
                title: title.to_string(),
                uri: uri.to_string(),
            })
        })
        .collect()
}

fn host_is_allowed(uri: &str) -> bool {
    let Ok(parsed) = Url::parse(uri) else {
        return false;
    };
    let Some(host) = parsed.host_str() else {
        return false;
    };
    ALLOWED_HOST_SUFFIXES
        .iter()
        .any(|suffix| host.ends_with(suffix))
}
