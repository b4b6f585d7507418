//! webmention_discover tool implementation.
//!
//! Finds a target URL's webmention endpoint, from the endpoint cache when
//! possible.

use mention_client::DiscoverOptions;
use mention_core::Error;
use rmcp::{ErrorData as McpError, model::*};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::tools::{ServerState, now_rfc3339};

/// Input parameters for webmention_discover tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct WebmentionDiscoverParams {
    /// The target URL whose endpoint to discover.
    pub url: String,

    /// Consult and fill the endpoint cache (default: from server config).
    #[serde(default)]
    pub use_cache: Option<bool>,

    /// Follow one HTML meta refresh (default: from server config).
    #[serde(default)]
    pub follow_meta_refresh: Option<bool>,
}

/// Output structure for webmention_discover tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct WebmentionDiscoverOutput {
    /// The URL discovery ran for.
    pub url: String,
    /// The discovered endpoint, null if none.
    pub endpoint: Option<String>,
    /// Whether the answer came from the endpoint cache.
    pub cached: bool,
    /// HTTP status of the fetch (absent when cached).
    pub status: Option<u16>,
    /// The final URL after redirects (absent when cached).
    pub final_url: Option<String>,
    /// Content-Type of the fetched page (absent when cached).
    pub content_type: Option<String>,
    /// ISO8601 timestamp of the discovery.
    pub fetched_at: String,
}

/// Run discovery and shape the result for output.
pub async fn discover_output(
    state: &ServerState, params: WebmentionDiscoverParams,
) -> Result<WebmentionDiscoverOutput, Error> {
    let mut options = DiscoverOptions::from(&state.config);
    if let Some(use_cache) = params.use_cache {
        options.use_cache = use_cache;
    }
    if let Some(follow) = params.follow_meta_refresh {
        options.follow_meta_refresh = follow;
    }

    let result = state.discoverer.discover(&params.url, &options).await?;
    let cached = result.is_cached();
    let response = result.response;

    Ok(WebmentionDiscoverOutput {
        url: params.url,
        endpoint: result.endpoint,
        cached,
        status: response.as_ref().map(|r| r.status.as_u16()),
        final_url: response.as_ref().map(|r| r.final_url.to_string()),
        content_type: response.and_then(|r| r.content_type),
        fetched_at: now_rfc3339(),
    })
}

/// Implementation of the webmention_discover tool.
pub async fn discover_impl(state: &ServerState, params: WebmentionDiscoverParams) -> Result<CallToolResult, McpError> {
    let output = discover_output(state, params).await?;

    let json = serde_json::to_string_pretty(&output)
        .map_err(|e| McpError::internal_error(format!("failed to serialize output: {e}"), None))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}
