//! endpoint_cache_clear tool implementation.
//!
//! Drops every cached discovery outcome so the next discovery refetches.

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::tools::ServerState;

/// Output from the endpoint_cache_clear tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheClearOutput {
    /// Number of entries the cache held before clearing.
    pub cleared: u64,
}

/// Implementation of the endpoint_cache_clear tool.
pub async fn cache_clear_impl(state: &ServerState) -> Result<CallToolResult, McpError> {
    let cleared = state.cache.len();
    state.cache.clear();
    tracing::info!(cleared, "endpoint cache cleared");

    let output = CacheClearOutput { cleared };
    let json = serde_json::to_string_pretty(&output)
        .map_err(|e| McpError::internal_error(format!("failed to serialize output: {e}"), None))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}
