//! Field normalizers for raw extracted values.
//!
//! Pure functions only; everything here is testable without a browser.

use regex::Regex;
use std::sync::LazyLock;
use url::Url;

/// Prefix of inline placeholder images used by lazy loaders.
const PLACEHOLDER_PREFIX: &str = "data:image";

/// Matches a `/p`-prefixed, digit-led product code segment, e.g. `/p7X42AB`.
///
/// The leading digit keeps `/product/...` paths from matching here as the
/// bogus code `roduct`; those fall through to the second pattern.
static P_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)/p(\d[a-z0-9]*)").expect("invalid product code pattern"));

/// Matches a `product/`- or `product-`-prefixed code, e.g. `product/AB12`.
static PRODUCT_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)product[/-]([a-z0-9]+)").expect("invalid product code pattern"));

/// Pick the usable image source from `src` and `data-src` attributes.
///
/// `src` wins unless it is absent, empty, or an inline placeholder, in
/// which case the lazy-load `data-src` value is used.
pub fn image_source(src: Option<&str>, data_src: Option<&str>) -> Option<String> {
    match src {
        Some(s) if !s.is_empty() && !s.starts_with(PLACEHOLDER_PREFIX) => Some(s.to_string()),
        _ => data_src.filter(|s| !s.is_empty()).map(str::to_string),
    }
}

/// Resolve an href against the page it was extracted from.
///
/// Relative paths are made absolute against the page URL; absolute hrefs
/// pass through. Without a usable base the href is kept as-is.
pub fn resolve_link(href: &str, base: Option<&Url>) -> Option<String> {
    if href.is_empty() {
        return None;
    }

    match base {
        Some(base) => match base.join(href) {
            Ok(resolved) => Some(resolved.to_string()),
            Err(_) => Some(href.to_string()),
        },
        None => Some(href.to_string()),
    }
}

/// Infer a product code from a resolved product link.
///
/// Applies the `/p<code>` pattern first, then `product/<code>` or
/// `product-<code>` (case-insensitive); first match wins.
pub fn infer_product_code(url: &str) -> Option<String> {
    if let Some(caps) = P_SEGMENT.captures(url) {
        return Some(caps[1].to_string());
    }
    PRODUCT_SEGMENT.captures(url).map(|caps| caps[1].to_string())
}
