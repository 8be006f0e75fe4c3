//! MCP tool implementations.
//!
//! This module contains all tools exposed by the mcp-shop server.

pub mod cache;
pub mod product_details;
pub mod product_search;

pub use product_details::ProductDetailsParams;
pub use product_search::ProductSearchParams;
