//! product_details tool implementation.
//!
//! Validates the caller-supplied configuration and URL, then extracts a
//! single product page. Detail requests are never cached.

use cartscout_client::ScrapeEngine;
use cartscout_core::{DetailSelectorSet, Error, SiteConfig};
use rmcp::{ErrorData as McpError, model::*};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Input parameters for product_details tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ProductDetailsParams {
    /// The site the product belongs to.
    pub site: SiteConfig,

    /// Absolute URL of the product page.
    pub product_url: String,

    /// Selectors for the detail page; title and price are required,
    /// everything else is extracted only when supplied.
    pub detail_selectors: DetailSelectorSet,
}

/// Implementation of the product_details tool.
pub async fn details_impl(engine: &ScrapeEngine, params: ProductDetailsParams) -> Result<CallToolResult, McpError> {
    params.site.validate()?;
    params.detail_selectors.validate()?;

    if url::Url::parse(&params.product_url).is_err() {
        return Err(Error::InvalidInput(format!("product_url is not a valid URL: {}", params.product_url)).into());
    }

    let detail = engine
        .product_details(&params.site, &params.product_url, &params.detail_selectors)
        .await?;

    Ok(CallToolResult::success(vec![Content::text(
        serde_json::to_string_pretty(&detail).unwrap_or_default(),
    )]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cartscout_core::{AppConfig, SelectorSet};

    fn params() -> ProductDetailsParams {
        ProductDetailsParams {
            site: SiteConfig {
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
            },
            product_url: "https://acme.test/p123".into(),
            detail_selectors: DetailSelectorSet {
                title: "h1".into(),
                price: ".price".into(),
                description: None,
                brand: None,
                rating: None,
                images: None,
                availability: None,
            },
        }
    }

    #[tokio::test]
    async fn test_details_invalid_url() {
        let engine = ScrapeEngine::new(&AppConfig::default());
        let mut params = params();
        params.product_url = "not a url".into();

        let result = details_impl(&engine, params).await;
        assert_eq!(result.unwrap_err().code.0, -32602);
    }

    #[tokio::test]
    async fn test_details_missing_price_selector() {
        let engine = ScrapeEngine::new(&AppConfig::default());
        let mut params = params();
        params.detail_selectors.price = String::new();

        let result = details_impl(&engine, params).await;
        assert!(result.is_err());
    }
}
