//! product_search tool implementation.
//!
//! Validates the caller-supplied site configuration and query, then runs
//! the cached search pipeline.

use cartscout_client::ScrapeEngine;
use cartscout_core::{Error, SiteConfig};
use rmcp::{ErrorData as McpError, model::*};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Input parameters for product_search tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ProductSearchParams {
    /// The site to scrape: name, search URL template, and selectors.
    pub site: SiteConfig,

    /// The search query; substituted into the URL template.
    pub query: String,

    /// 1-based results page number (default: 1).
    #[serde(default = "default_page")]
    pub page: u32,
}

fn default_page() -> u32 {
    1
}

/// Implementation of the product_search tool.
pub async fn search_impl(engine: &ScrapeEngine, params: ProductSearchParams) -> Result<CallToolResult, McpError> {
    params.site.validate()?;

    if params.query.trim().is_empty() {
        return Err(Error::InvalidInput("query cannot be empty".into()).into());
    }
    if params.page == 0 {
        return Err(Error::InvalidInput("page must be a positive integer".into()).into());
    }

    let result = engine.search(&params.site, &params.query, params.page).await?;

    Ok(CallToolResult::success(vec![Content::text(
        serde_json::to_string_pretty(&result).unwrap_or_default(),
    )]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cartscout_core::{AppConfig, SelectorSet};

    fn acme_site() -> SiteConfig {
        SiteConfig {
            name: "Acme".into(),
            search_url: "https://acme.test/s?q={query}".into(),
            selectors: SelectorSet {
                product_card: ".card".into(),
                title: ".t".into(),
                price: ".p".into(),
                image: "img".into(),
                link: "a".into(),
                brand: None,
                rating: None,
            },
        }
    }

    fn test_engine() -> ScrapeEngine {
        ScrapeEngine::new(&AppConfig::default())
    }

    #[tokio::test]
    async fn test_search_empty_query() {
        let engine = test_engine();
        let params = ProductSearchParams { site: acme_site(), query: "   ".into(), page: 1 };

        let result = search_impl(&engine, params).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_search_page_zero() {
        let engine = test_engine();
        let params = ProductSearchParams { site: acme_site(), query: "drill".into(), page: 0 };

        let result = search_impl(&engine, params).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_search_invalid_site_config() {
        let engine = test_engine();
        let mut site = acme_site();
        site.search_url = "https://acme.test/s".into();
        let params = ProductSearchParams { site, query: "drill".into(), page: 1 };

        let result = search_impl(&engine, params).await;
        assert_eq!(result.unwrap_err().code.0, -32602);
    }

    #[test]
    fn test_default_page_is_one() {
        let params: ProductSearchParams =
            serde_json::from_value(serde_json::json!({
                "site": acme_site(),
                "query": "drill",
            }))
            .unwrap();
        assert_eq!(params.page, 1);
    }
}
