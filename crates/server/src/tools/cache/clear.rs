//! cache_clear tool implementation.

use cartscout_client::ScrapeEngine;
use cartscout_core::Error;
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Output from the cache_clear tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheClearOutput {
    /// Number of entries dropped.
    pub cleared: usize,
}

/// Implementation of the cache_clear tool.
pub async fn clear_impl(engine: &ScrapeEngine) -> Result<CallToolResult, McpError> {
    let cleared = engine.clear_cache();
    tracing::debug!(cleared, "search cache cleared");

    let output = CacheClearOutput { cleared };
    let json = serde_json::to_string_pretty(&output)
        .map_err(|e| Error::InvalidInput(format!("Failed to serialize output: {e}")))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}
