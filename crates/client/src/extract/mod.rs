//! Snapshot extraction with caller-supplied selectors.
//!
//! Extraction is a pure function of a DOM snapshot and a selector set,
//! returning raw field values. Selector strings are opaque here; they are
//! handed to the query layer unmodified, and a string the query layer
//! rejects surfaces as an extraction error.

pub mod normalize;

use cartscout_core::model::{DetailSelectorSet, SelectorSet};
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from snapshot extraction.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The query layer rejected a caller-supplied selector string.
    #[error("unusable selector {selector:?}: {reason}")]
    Selector { selector: String, reason: String },
}

/// Raw field values pulled from one product card, before normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawProductCard {
    pub title: Option<String>,
    pub price: Option<String>,
    pub brand: Option<String>,
    pub rating: Option<String>,
    pub image: Option<String>,
    pub link: Option<String>,
}

/// Raw field values pulled from a product-detail page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawDetail {
    pub title: Option<String>,
    pub price: Option<String>,
    pub description: Option<String>,
    pub brand: Option<String>,
    pub rating: Option<String>,
    pub images: Vec<String>,
    pub availability: Option<String>,
}

fn parse_selector(raw: &str) -> Result<Selector, ExtractError> {
    Selector::parse(raw)
        .map_err(|e| ExtractError::Selector { selector: raw.to_string(), reason: e.to_string() })
}

/// Trimmed text content of the first match under `scope`, if non-empty.
fn first_text(scope: ElementRef<'_>, selector: &Selector) -> Option<String> {
    scope.select(selector).next().and_then(|el| {
        let text = el.text().collect::<String>();
        let text = text.trim();
        if text.is_empty() { None } else { Some(text.to_string()) }
    })
}

/// Resolved image source of an element, with the lazy-load fallback.
fn element_image(el: ElementRef<'_>) -> Option<String> {
    normalize::image_source(el.value().attr("src"), el.value().attr("data-src"))
}

/// Enumerate all product cards in a search-results snapshot.
///
/// Every card present in the document yields a record here, including
/// partial ones; the engine decides which records qualify.
pub fn extract_product_cards(
    html: &str, selectors: &SelectorSet,
) -> Result<Vec<RawProductCard>, ExtractError> {
    let document = Html::parse_document(html);

    let card_sel = parse_selector(&selectors.product_card)?;
    let title_sel = parse_selector(&selectors.title)?;
    let price_sel = parse_selector(&selectors.price)?;
    let image_sel = parse_selector(&selectors.image)?;
    let link_sel = parse_selector(&selectors.link)?;
    let brand_sel = selectors.brand.as_deref().map(parse_selector).transpose()?;
    let rating_sel = selectors.rating.as_deref().map(parse_selector).transpose()?;

    let mut cards = Vec::new();
    for card in document.select(&card_sel) {
        let image = card.select(&image_sel).next().and_then(element_image);
        let link = card
            .select(&link_sel)
            .next()
            .and_then(|el| el.value().attr("href"))
            .filter(|href| !href.is_empty())
            .map(str::to_string);

        cards.push(RawProductCard {
            title: first_text(card, &title_sel),
            price: first_text(card, &price_sel),
            brand: brand_sel.as_ref().and_then(|sel| first_text(card, sel)),
            rating: rating_sel.as_ref().and_then(|sel| first_text(card, sel)),
            image,
            link,
        });
    }

    Ok(cards)
}

/// Extract the fields of a product-detail snapshot.
///
/// Optional fields are read only when their selector was supplied. The
/// image gallery keeps document order and skips elements that yield
/// neither a real `src` nor a `data-src`.
pub fn extract_detail(html: &str, selectors: &DetailSelectorSet) -> Result<RawDetail, ExtractError> {
    let document = Html::parse_document(html);
    let root = document.root_element();

    let title_sel = parse_selector(&selectors.title)?;
    let price_sel = parse_selector(&selectors.price)?;
    let description_sel = selectors.description.as_deref().map(parse_selector).transpose()?;
    let brand_sel = selectors.brand.as_deref().map(parse_selector).transpose()?;
    let rating_sel = selectors.rating.as_deref().map(parse_selector).transpose()?;
    let availability_sel = selectors.availability.as_deref().map(parse_selector).transpose()?;

    let mut images = Vec::new();
    if let Some(raw) = &selectors.images {
        let images_sel = parse_selector(raw)?;
        for el in document.select(&images_sel) {
            if let Some(src) = element_image(el) {
                images.push(src);
            }
        }
    }

    Ok(RawDetail {
        title: first_text(root, &title_sel),
        price: first_text(root, &price_sel),
        description: description_sel.as_ref().and_then(|sel| first_text(root, sel)),
        brand: brand_sel.as_ref().and_then(|sel| first_text(root, sel)),
        rating: rating_sel.as_ref().and_then(|sel| first_text(root, sel)),
        images,
        availability: availability_sel.as_ref().and_then(|sel| first_text(root, sel)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn acme_selectors() -> SelectorSet {
        SelectorSet {
            product_card: ".card".into(),
            title: ".t".into(),
            price: ".p".into(),
            image: "img".into(),
            link: "a".into(),
            brand: None,
            rating: None,
        }
    }

    #[test]
    fn test_extract_cards_basic() {
        let html = r#"
            <div class="card">
                <span class="t">Cordless Drill</span>
                <span class="p">$129.00</span>
                <img src="https://cdn.test/drill.jpg">
                <a href="/p123">view</a>
            </div>
        "#;

        let cards = extract_product_cards(html, &acme_selectors()).unwrap();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].title.as_deref(), Some("Cordless Drill"));
        assert_eq!(cards[0].price.as_deref(), Some("$129.00"));
        assert_eq!(cards[0].image.as_deref(), Some("https://cdn.test/drill.jpg"));
        assert_eq!(cards[0].link.as_deref(), Some("/p123"));
    }

    #[test]
    fn test_extract_cards_partial_card_kept_raw() {
        let html = r#"
            <div class="card"><span class="t">Full</span><span class="p">$1</span></div>
            <div class="card"><span class="t">Title only</span></div>
        "#;

        let cards = extract_product_cards(html, &acme_selectors()).unwrap();
        assert_eq!(cards.len(), 2);
        assert!(cards[1].price.is_none());
    }

    #[test]
    fn test_extract_cards_lazy_image_fallback() {
        let html = r#"
            <div class="card">
                <span class="t">Drill</span>
                <span class="p">$1</span>
                <img src="data:image/gif;base64,R0lGOD" data-src="https://cdn.test/real.jpg">
            </div>
        "#;

        let cards = extract_product_cards(html, &acme_selectors()).unwrap();
        assert_eq!(cards[0].image.as_deref(), Some("https://cdn.test/real.jpg"));
    }

    #[test]
    fn test_extract_cards_optional_selectors() {
        let mut selectors = acme_selectors();
        selectors.brand = Some(".b".into());
        selectors.rating = Some(".r".into());

        let html = r#"
            <div class="card">
                <span class="t">Drill</span>
                <span class="p">$1</span>
                <span class="b">Acme Tools</span>
                <span class="r">4.5 stars</span>
            </div>
        "#;

        let cards = extract_product_cards(html, &selectors).unwrap();
        assert_eq!(cards[0].brand.as_deref(), Some("Acme Tools"));
        assert_eq!(cards[0].rating.as_deref(), Some("4.5 stars"));
    }

    #[test]
    fn test_extract_cards_whitespace_text_is_absent() {
        let html = r#"<div class="card"><span class="t">   </span><span class="p">$1</span></div>"#;
        let cards = extract_product_cards(html, &acme_selectors()).unwrap();
        assert!(cards[0].title.is_none());
    }

    #[test]
    fn test_extract_cards_bad_selector() {
        let mut selectors = acme_selectors();
        selectors.product_card = ":::".into();
        assert!(extract_product_cards("<div></div>", &selectors).is_err());
    }

    #[test]
    fn test_extract_cards_empty_page() {
        let cards = extract_product_cards("<html><body></body></html>", &acme_selectors()).unwrap();
        assert!(cards.is_empty());
    }

    fn detail_selectors() -> DetailSelectorSet {
        DetailSelectorSet {
            title: "h1".into(),
            price: ".price".into(),
            description: Some(".desc".into()),
            brand: None,
            rating: None,
            images: Some(".gallery img".into()),
            availability: Some(".stock".into()),
        }
    }

    #[test]
    fn test_extract_detail_fields() {
        let html = r#"
            <h1> Cordless Drill </h1>
            <span class="price">$129.00</span>
            <p class="desc">A drill.</p>
            <span class="stock">In stock</span>
        "#;

        let detail = extract_detail(html, &detail_selectors()).unwrap();
        assert_eq!(detail.title.as_deref(), Some("Cordless Drill"));
        assert_eq!(detail.price.as_deref(), Some("$129.00"));
        assert_eq!(detail.description.as_deref(), Some("A drill."));
        assert_eq!(detail.availability.as_deref(), Some("In stock"));
        assert!(detail.brand.is_none());
    }

    #[test]
    fn test_extract_detail_images_document_order() {
        let html = r#"
            <div class="gallery">
                <img src="https://cdn.test/1.jpg">
                <img src="https://cdn.test/2.jpg">
                <img data-src="https://cdn.test/3.jpg">
            </div>
        "#;

        let detail = extract_detail(html, &detail_selectors()).unwrap();
        assert_eq!(
            detail.images,
            vec![
                "https://cdn.test/1.jpg".to_string(),
                "https://cdn.test/2.jpg".to_string(),
                "https://cdn.test/3.jpg".to_string(),
            ]
        );
    }

    #[test]
    fn test_extract_detail_skips_sourceless_images() {
        let html = r#"
            <div class="gallery">
                <img src="https://cdn.test/1.jpg">
                <img alt="no source">
            </div>
        "#;

        let detail = extract_detail(html, &detail_selectors()).unwrap();
        assert_eq!(detail.images.len(), 1);
    }

    #[test]
    fn test_extract_detail_unselected_fields_stay_empty() {
        let selectors = DetailSelectorSet {
            title: "h1".into(),
            price: ".price".into(),
            description: None,
            brand: None,
            rating: None,
            images: None,
            availability: None,
        };

        let html = r#"
            <h1>Drill</h1>
            <span class="price">$1</span>
            <p class="desc">ignored</p>
            <img src="https://cdn.test/ignored.jpg">
        "#;

        let detail = extract_detail(html, &selectors).unwrap();
        assert!(detail.description.is_none());
        assert!(detail.images.is_empty());
    }
}
