//! Scraping client for cartscout.
//!
//! This crate provides browser session management, page-snapshot
//! extraction, field normalization, and the scrape engine that ties them
//! together behind the search/detail operations.

pub mod extract;
pub mod scrape;
pub mod session;

pub use extract::normalize::{image_source, infer_product_code, resolve_link};
pub use extract::{ExtractError, RawDetail, RawProductCard, extract_detail, extract_product_cards};
pub use scrape::ScrapeEngine;
pub use session::{SessionConfig, SessionError, SessionManager};
