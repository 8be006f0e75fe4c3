//! Composite cache-key construction.

/// Build the cache key for a search request.
///
/// The key is the case-sensitive, unnormalized triple of site name, query,
/// and page; two queries differing only in casing are distinct entries.
pub fn cache_key(site: &str, query: &str, page: u32) -> String {
    format!("{site}::{query}::{page}")
}
