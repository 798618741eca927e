pub mod client;
pub mod detail;
pub mod extract;
pub mod listing;

pub use client::LetterboxdScraper;
pub use detail::{enrich_from_html, ExtractionRule, FieldValue, Precedence, DETAIL_RULES};
pub use listing::{parse_listing_page, ListingPage};

use scraper::Selector;

/// Compile a selector literal. Only ever called with constants.
pub(crate) fn css(selector: &'static str) -> Selector {
    Selector::parse(selector).unwrap_or_else(|e| panic!("invalid selector {:?}: {}", selector, e))
}

/// Concatenated text of an element, trimmed.
pub(crate) fn element_text(element: &scraper::ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
