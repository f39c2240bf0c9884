//! Structured extraction from static markup.
//!
//! Each [`SiteFamily`] carries a [`SelectorSpec`]: ranked CSS selectors for
//! the product name and price. One ladder algorithm runs over whichever spec
//! the router picked:
//!
//! ```text
//! markup → name ladder (first match) → price ladder (first normalizable match)
//! ```

mod sites;

pub use sites::SiteFamily;

use scraper::{ElementRef, Html, Selector};

use crate::normalizer::normalize_price;

/// Ranked selectors for one site family. Earlier entries win.
#[derive(Debug, Clone, Copy)]
pub struct SelectorSpec {
    pub name: &'static [&'static str],
    pub price: &'static [&'static str],
}

/// Name and price found in one document; either may be missing
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedFields {
    pub name: Option<String>,
    pub price: Option<f64>,
}

/// Run the name and price ladders of `spec` against `markup`
pub fn extract_fields(markup: &str, spec: &SelectorSpec) -> ExtractedFields {
    let document = Html::parse_document(markup);

    let name = spec
        .name
        .iter()
        .find_map(|selector| first_match(&document, selector))
        .map(|el| element_text(&el))
        .filter(|text| !text.is_empty());

    let price = spec.price.iter().find_map(|selector| {
        let el = first_match(&document, selector)?;
        let price = normalize_price(&element_text(&el));
        if price.is_some() {
            tracing::debug!("Price matched selector {}", selector);
        }
        price
    });

    ExtractedFields { name, price }
}

fn first_match<'a>(document: &'a Html, selector: &str) -> Option<ElementRef<'a>> {
    let selector = match Selector::parse(selector) {
        Ok(s) => s,
        Err(_) => {
            tracing::warn!("Skipping invalid selector: {}", selector);
            return None;
        }
    };

    document.select(&selector).next()
}

fn element_text(el: &ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}
