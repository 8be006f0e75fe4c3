//! Unified error types for cartscout.
//!
//! Internal faults carry coded messages; the two boundary variants
//! (`ScrapeFailed`, `DetailFailed`) carry the exact wording surfaced to
//! callers of the engine.

use rmcp::model::{ErrorCode, ErrorData as McpError};

/// Unified error types for the cartscout engine and server.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., malformed site config, empty query).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// Failed to launch or connect to the shared browser process.
    #[error("BROWSER_LAUNCH: {0}")]
    BrowserLaunch(String),

    /// Navigation to the target page failed.
    #[error("NAVIGATION: {0}")]
    Navigation(String),

    /// Navigation did not settle within its window.
    #[error("NAVIGATION_TIMEOUT: not settled after {0}ms")]
    NavigationTimeout(u64),

    /// No element matched the awaited selector within its window.
    #[error("SELECTOR_TIMEOUT: no match for {selector} after {timeout_ms}ms")]
    SelectorTimeout { selector: String, timeout_ms: u64 },

    /// Snapshot extraction failed (unparseable selector, bad document).
    #[error("EXTRACT_FAILED: {0}")]
    ExtractFailed(String),

    /// A search request failed; wraps the underlying cause.
    #[error("Failed to scrape {site}: {cause}")]
    ScrapeFailed { site: String, cause: String },

    /// A product-detail request failed; wraps the underlying cause.
    #[error("Failed to get product details: {0}")]
    DetailFailed(String),
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let code = match &err {
            Error::InvalidInput(_) => -32602,
            Error::ScrapeFailed { .. } => -32000,
            Error::DetailFailed(_) => -32001,
            Error::BrowserLaunch(_) => -32002,
            Error::Navigation(_) => -32003,
            Error::NavigationTimeout(_) => -32004,
            Error::SelectorTimeout { .. } => -32005,
            Error::ExtractFailed(_) => -32006,
        };

        McpError { code: ErrorCode(code), message: err.to_string().into(), data: None }
    }
}
