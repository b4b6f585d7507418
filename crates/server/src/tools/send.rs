//! webmention_send tool implementation.
//!
//! POSTs `source` and `target` to a webmention endpoint.

use mention_core::Error;
use rmcp::{ErrorData as McpError, model::*};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::tools::{ServerState, now_rfc3339};

/// Input parameters for webmention_send tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct WebmentionSendParams {
    /// The webmention endpoint, usually from webmention_discover.
    pub endpoint: String,

    /// The page that mentions the target.
    pub source: String,

    /// The page being mentioned.
    pub target: String,

    /// Re-POST to 3xx Location targets instead of returning the redirect.
    #[serde(default)]
    pub follow_redirects: bool,
}

/// Output structure for webmention_send tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct WebmentionSendOutput {
    /// The endpoint that produced the final response.
    pub endpoint: String,
    /// HTTP status of the final response.
    pub status: u16,
    /// Resolved Location header, if any.
    pub location: Option<String>,
    /// Response body.
    pub body: String,
    /// ISO8601 timestamp of the send.
    pub sent_at: String,
}

/// Send the webmention and shape the response for output.
pub async fn send_output(state: &ServerState, params: WebmentionSendParams) -> Result<WebmentionSendOutput, Error> {
    let headers = Default::default();

    let response = if params.follow_redirects {
        state
            .sender
            .send_following_redirects(
                &params.endpoint,
                &params.source,
                &params.target,
                &headers,
                state.config.max_redirects,
            )
            .await?
    } else {
        state
            .sender
            .send(&params.endpoint, &params.source, &params.target, &headers)
            .await?
    };

    Ok(WebmentionSendOutput {
        endpoint: response.url.to_string(),
        status: response.status.as_u16(),
        location: response.location(),
        body: response.text().into_owned(),
        sent_at: now_rfc3339(),
    })
}

/// Implementation of the webmention_send tool.
pub async fn send_impl(state: &ServerState, params: WebmentionSendParams) -> Result<CallToolResult, McpError> {
    let output = send_output(state, params).await?;

    let json = serde_json::to_string_pretty(&output)
        .map_err(|e| McpError::internal_error(format!("failed to serialize output: {e}"), None))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}
