//! Scrape engine orchestration.
//!
//! Drives one browser page context per request through the fixed
//! navigate / wait / settle / snapshot pipeline, runs the pure extraction
//! and normalization layers over the snapshot, and serves repeated search
//! requests from the time-bounded cache.

use crate::extract::{self, RawProductCard, normalize};
use crate::session::{SessionConfig, SessionManager};
use cartscout_core::cache::{SearchCache, cache_key};
use cartscout_core::model::{DetailSelectorSet, ProductDetail, ProductSummary, SearchResult, SiteConfig};
use cartscout_core::{AppConfig, Error};
use chromiumoxide::cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams;
use chromiumoxide::page::Page;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use std::time::Duration;
use url::Url;

/// Constant browser identity presented to scraped sites.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Fixed viewport applied to every page context.
const VIEWPORT_WIDTH: i64 = 1920;
const VIEWPORT_HEIGHT: i64 = 1080;

/// Window for a navigation to settle.
const NAV_TIMEOUT: Duration = Duration::from_secs(30);

/// Window for the first product-card match to appear.
const SELECTOR_TIMEOUT: Duration = Duration::from_secs(15);

/// Interval between product-card polls.
const SELECTOR_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Fixed post-wait delay for late-rendering client-side content.
const SETTLE_DELAY: Duration = Duration::from_secs(2);

/// Characters escaped when substituting the query into the URL template.
///
/// Everything outside the unreserved set `A-Z a-z 0-9 - _ . ! ~ * ' ( )`
/// is percent-encoded.
const QUERY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Configuration-driven product extraction engine.
///
/// Shared state is limited to the result cache and the browser handle;
/// every request runs in its own page context.
pub struct ScrapeEngine {
    session: SessionManager,
    cache: SearchCache,
}

impl ScrapeEngine {
    /// Build an engine from the application configuration.
    ///
    /// The browser is not launched until the first request or an explicit
    /// `init`.
    pub fn new(config: &AppConfig) -> Self {
        let session = SessionManager::new(SessionConfig {
            browser_path: config.browser_path.clone(),
            headless: config.headless,
        });
        Self { session, cache: SearchCache::new() }
    }

    /// Eagerly start the shared browser process.
    pub async fn init(&self) -> Result<(), Error> {
        self.session
            .ensure_started()
            .await
            .map_err(|e| Error::BrowserLaunch(e.to_string()))
    }

    /// Shut the shared browser process down; safe when never started.
    pub async fn close(&self) {
        self.session.shutdown().await;
    }

    /// Drop all cached search results, returning how many were held.
    pub fn clear_cache(&self) -> usize {
        self.cache.clear()
    }

    /// Search a site for products.
    ///
    /// Serves a fresh copy from the cache when one is younger than an
    /// hour; otherwise scrapes, stores, and returns the new result. Input
    /// validation is the caller's responsibility, but an empty result set
    /// is a valid success.
    ///
    /// # Errors
    ///
    /// Any navigation, timeout, or extraction fault is wrapped as a single
    /// `Error::ScrapeFailed` naming the site; no partial results, no
    /// internal retry.
    pub async fn search(
        &self, config: &SiteConfig, query: &str, page: u32,
    ) -> Result<SearchResult, Error> {
        let key = cache_key(&config.name, query, page);
        if let Some(hit) = self.cache.get(&key) {
            tracing::debug!(site = %config.name, query, page, "cache hit");
            return Ok(hit);
        }

        let page_ctx = self
            .session
            .new_context()
            .await
            .map_err(|e| Error::ScrapeFailed { site: config.name.clone(), cause: e.to_string() })?;

        // The context is closed on every exit path before an error is
        // reported upward.
        let outcome = self.run_search(&page_ctx, config, query, page).await;
        page_ctx.close().await.ok();

        let result = outcome
            .map_err(|e| Error::ScrapeFailed { site: config.name.clone(), cause: e.to_string() })?;

        self.cache.put(&key, &result);
        Ok(result)
    }

    /// Extract a single product's details; never cached.
    ///
    /// # Errors
    ///
    /// Any fault is wrapped as a single `Error::DetailFailed`.
    pub async fn product_details(
        &self, config: &SiteConfig, product_url: &str, selectors: &DetailSelectorSet,
    ) -> Result<ProductDetail, Error> {
        let page_ctx = self
            .session
            .new_context()
            .await
            .map_err(|e| Error::DetailFailed(e.to_string()))?;

        let outcome = self.run_details(&page_ctx, config, product_url, selectors).await;
        page_ctx.close().await.ok();

        outcome.map_err(|e| Error::DetailFailed(e.to_string()))
    }

    async fn run_search(
        &self, page: &Page, config: &SiteConfig, query: &str, page_no: u32,
    ) -> Result<SearchResult, Error> {
        prepare_page(page).await?;

        let url = build_search_url(&config.search_url, query);
        tracing::debug!(site = %config.name, %url, "navigating to search page");

        navigate_settled(page, &url).await?;
        wait_for_selector(page, &config.selectors.product_card).await?;
        tokio::time::sleep(SETTLE_DELAY).await;

        let html = page
            .content()
            .await
            .map_err(|e| Error::ExtractFailed(e.to_string()))?;
        let base = page_base_url(page).await;

        let cards = extract::extract_product_cards(&html, &config.selectors)
            .map_err(|e| Error::ExtractFailed(e.to_string()))?;
        let results = summarize_cards(cards, base.as_ref());

        tracing::debug!(site = %config.name, count = results.len(), "search scrape complete");

        Ok(SearchResult {
            site: config.name.clone(),
            query: query.to_string(),
            page: page_no,
            total_results: results.len(),
            results,
            cached: false,
            timestamp: now_timestamp(),
        })
    }

    async fn run_details(
        &self, page: &Page, config: &SiteConfig, product_url: &str, selectors: &DetailSelectorSet,
    ) -> Result<ProductDetail, Error> {
        prepare_page(page).await?;

        tracing::debug!(site = %config.name, url = product_url, "navigating to product page");

        // Unlike search there is no selector to await here; detail pages
        // rely on the settle delay alone.
        navigate_settled(page, product_url).await?;
        tokio::time::sleep(SETTLE_DELAY).await;

        let html = page
            .content()
            .await
            .map_err(|e| Error::ExtractFailed(e.to_string()))?;
        let raw = extract::extract_detail(&html, selectors)
            .map_err(|e| Error::ExtractFailed(e.to_string()))?;

        Ok(ProductDetail {
            site: config.name.clone(),
            url: product_url.to_string(),
            title: raw.title,
            price: raw.price,
            description: raw.description,
            brand: raw.brand,
            rating: raw.rating,
            images: raw.images,
            availability: raw.availability,
            timestamp: now_timestamp(),
        })
    }
}

/// Apply the constant user-agent and viewport to a fresh page context.
async fn prepare_page(page: &Page) -> Result<(), Error> {
    page.set_user_agent(USER_AGENT)
        .await
        .map_err(|e| Error::Navigation(e.to_string()))?;

    let metrics = SetDeviceMetricsOverrideParams::builder()
        .width(VIEWPORT_WIDTH)
        .height(VIEWPORT_HEIGHT)
        .device_scale_factor(1.0)
        .mobile(false)
        .build()
        .map_err(Error::Navigation)?;
    page.execute(metrics)
        .await
        .map_err(|e| Error::Navigation(e.to_string()))?;

    Ok(())
}

/// Substitute the percent-encoded query into the URL template.
fn build_search_url(template: &str, query: &str) -> String {
    let encoded = utf8_percent_encode(query, QUERY_ENCODE_SET).to_string();
    template.replacen("{query}", &encoded, 1)
}

/// Navigate and wait for the navigation to settle, bounded by the fixed
/// window.
async fn navigate_settled(page: &Page, url: &str) -> Result<(), Error> {
    tokio::time::timeout(NAV_TIMEOUT, async {
        page.goto(url)
            .await
            .map_err(|e| Error::Navigation(e.to_string()))?;
        page.wait_for_navigation()
            .await
            .map_err(|e| Error::Navigation(e.to_string()))?;
        Ok(())
    })
    .await
    .map_err(|_| Error::NavigationTimeout(NAV_TIMEOUT.as_millis() as u64))?
}

/// Poll until at least one element matches `selector`, bounded by the
/// fixed window.
async fn wait_for_selector(page: &Page, selector: &str) -> Result<(), Error> {
    tokio::time::timeout(SELECTOR_TIMEOUT, async {
        loop {
            if page.find_element(selector).await.is_ok() {
                return;
            }
            tokio::time::sleep(SELECTOR_POLL_INTERVAL).await;
        }
    })
    .await
    .map_err(|_| Error::SelectorTimeout {
        selector: selector.to_string(),
        timeout_ms: SELECTOR_TIMEOUT.as_millis() as u64,
    })
}

/// The page's final URL, used as the base for link resolution.
async fn page_base_url(page: &Page) -> Option<Url> {
    let current = page.url().await.ok().flatten()?;
    Url::parse(&current).ok()
}

/// Turn raw cards into qualifying product records.
///
/// Cards lacking a title or a price are dropped; links are resolved
/// against the page URL and product codes inferred from the result.
fn summarize_cards(cards: Vec<RawProductCard>, base: Option<&Url>) -> Vec<ProductSummary> {
    cards
        .into_iter()
        .filter_map(|card| {
            let RawProductCard { title, price, brand, rating, image, link } = card;
            let (title, price) = match (title, price) {
                (Some(title), Some(price)) => (title, price),
                _ => return None,
            };

            let url = link.as_deref().and_then(|href| normalize::resolve_link(href, base));
            let product_code = url.as_deref().and_then(normalize::infer_product_code);

            Some(ProductSummary { product_code, title, brand, price, rating, image, url })
        })
        .collect()
}

/// RFC 3339 timestamp for result records.
fn now_timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}
