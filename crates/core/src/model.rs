//! Site configurations and product records.
//!
//! These are the exchange types between the serving layer and the scrape
//! engine. Site configurations are caller-supplied per request and never
//! persisted; the serving layer validates them before the engine runs.

use crate::Error;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A declarative description of one e-commerce site.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SiteConfig {
    /// Display name of the site; also part of the cache key.
    pub name: String,

    /// Search URL template containing a single `{query}` placeholder.
    pub search_url: String,

    /// Content selectors for search-result pages.
    pub selectors: SelectorSet,
}

/// Selectors for search-result pages.
///
/// A selector is an opaque string interpreted by the page-query layer;
/// the engine never inspects its syntax.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SelectorSet {
    /// Container element of one product card.
    pub product_card: String,

    /// Product title, relative to the card.
    pub title: String,

    /// Product price, relative to the card.
    pub price: String,

    /// Product image, relative to the card.
    pub image: String,

    /// Product link, relative to the card.
    pub link: String,

    /// Brand name, relative to the card (optional).
    #[serde(default)]
    pub brand: Option<String>,

    /// Rating text, relative to the card (optional).
    #[serde(default)]
    pub rating: Option<String>,
}

/// Selectors for single product-detail pages.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DetailSelectorSet {
    /// Product title.
    pub title: String,

    /// Product price.
    pub price: String,

    /// Long description (optional).
    #[serde(default)]
    pub description: Option<String>,

    /// Brand name (optional).
    #[serde(default)]
    pub brand: Option<String>,

    /// Rating text (optional).
    #[serde(default)]
    pub rating: Option<String>,

    /// Gallery images; every match contributes one entry (optional).
    #[serde(default)]
    pub images: Option<String>,

    /// Availability text (optional).
    #[serde(default)]
    pub availability: Option<String>,
}

/// One normalized product record from a search-results page.
///
/// Present in a result set only when both title and price were found;
/// cards failing that are dropped, never surfaced as partial records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ProductSummary {
    /// Product code inferred from the link, if any pattern matched.
    pub product_code: Option<String>,
    /// Trimmed title text.
    pub title: String,
    /// Trimmed brand text, when a brand selector was supplied and matched.
    pub brand: Option<String>,
    /// Trimmed price text.
    pub price: String,
    /// Trimmed rating text, when a rating selector was supplied and matched.
    pub rating: Option<String>,
    /// Resolved image source.
    pub image: Option<String>,
    /// Absolute product URL.
    pub url: Option<String>,
}

/// One extracted product-detail record.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ProductDetail {
    /// Site name from the supplied configuration.
    pub site: String,
    /// The product URL that was scraped.
    pub url: String,
    /// Trimmed title text, if found.
    pub title: Option<String>,
    /// Trimmed price text, if found.
    pub price: Option<String>,
    /// Trimmed description text, if a selector was supplied and matched.
    pub description: Option<String>,
    /// Trimmed brand text, if a selector was supplied and matched.
    pub brand: Option<String>,
    /// Trimmed rating text, if a selector was supplied and matched.
    pub rating: Option<String>,
    /// Resolved gallery image sources in document order.
    pub images: Vec<String>,
    /// Trimmed availability text, if a selector was supplied and matched.
    pub availability: Option<String>,
    /// RFC 3339 timestamp of the extraction.
    pub timestamp: String,
}

/// A completed search response.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SearchResult {
    /// Site name from the supplied configuration.
    pub site: String,
    /// The query as given, not normalized.
    pub query: String,
    /// 1-based results page number.
    pub page: u32,
    /// Always equals `results.len()`.
    pub total_results: usize,
    /// Qualifying product records in page order.
    pub results: Vec<ProductSummary>,
    /// Whether this response was served from the cache.
    pub cached: bool,
    /// RFC 3339 timestamp of the underlying scrape.
    pub timestamp: String,
}

impl SiteConfig {
    /// Validate a caller-supplied site configuration.
    ///
    /// The engine assumes validated input; the serving layer runs this
    /// before any browser work starts.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` if the name is empty, the URL template
    /// lacks a `{query}` placeholder, or any required selector is empty.
    pub fn validate(&self) -> Result<(), Error> {
        if self.name.trim().is_empty() {
            return Err(Error::InvalidInput("site name cannot be empty".into()));
        }
        if !self.search_url.contains("{query}") {
            return Err(Error::InvalidInput(format!(
                "search_url for {} must contain a {{query}} placeholder",
                self.name
            )));
        }

        let required = [
            ("product_card", &self.selectors.product_card),
            ("title", &self.selectors.title),
            ("price", &self.selectors.price),
            ("image", &self.selectors.image),
            ("link", &self.selectors.link),
        ];
        for (field, selector) in required {
            if selector.trim().is_empty() {
                return Err(Error::InvalidInput(format!(
                    "selector {field} is required and cannot be empty"
                )));
            }
        }

        Ok(())
    }
}

impl DetailSelectorSet {
    /// Validate a caller-supplied detail selector set.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` if the title or price selector is empty.
    pub fn validate(&self) -> Result<(), Error> {
        if self.title.trim().is_empty() {
            return Err(Error::InvalidInput("detail selector title is required".into()));
        }
        if self.price.trim().is_empty() {
            return Err(Error::InvalidInput("detail selector price is required".into()));
        }
        Ok(())
    }
}
