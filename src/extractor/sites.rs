use std::fmt;

use crate::extractor::SelectorSpec;

/// Marketplaces with known product page markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiteFamily {
    Amazon,
    Ebay,
    Walmart,
}

const AMAZON: SelectorSpec = SelectorSpec {
    name: &[
        "#productTitle",
        "h1.a-size-large",
        ".product-title",
        "h1[data-automation-id=\"product-title\"]",
    ],
    price: &[
        ".a-price-whole",
        ".a-offscreen",
        "#priceblock_dealprice",
        "#priceblock_ourprice",
        ".a-price-range",
        "[data-automation-id=\"product-price\"]",
    ],
};

const EBAY: SelectorSpec = SelectorSpec {
    name: &[
        "#x-title-label-lbl",
        ".x-title-label",
        "h1[data-testid=\"x-title-label\"]",
        ".u-flL.condText",
    ],
    price: &[
        ".notranslate",
        "#prcIsum",
        ".u-flL.condText",
        "[data-testid=\"x-price-primary\"]",
    ],
};

const WALMART: SelectorSpec = SelectorSpec {
    name: &[
        "[data-automation-id=\"product-title\"]",
        "h1.prod-ProductTitle",
        ".prod-ProductTitle",
        "h1[data-testid=\"product-title\"]",
    ],
    price: &[
        "[data-automation-id=\"product-price\"]",
        ".price-current",
        ".price-group",
        "[data-testid=\"price-current\"]",
    ],
};

impl SiteFamily {
    pub const ALL: [SiteFamily; 3] = [SiteFamily::Amazon, SiteFamily::Ebay, SiteFamily::Walmart];

    /// Classify a lowercased host by substring, first family wins
    pub fn classify(host: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|family| host.contains(family.domain_marker()))
    }

    pub fn domain_marker(&self) -> &'static str {
        match self {
            SiteFamily::Amazon => "amazon",
            SiteFamily::Ebay => "ebay",
            SiteFamily::Walmart => "walmart",
        }
    }

    pub fn selectors(&self) -> &'static SelectorSpec {
        match self {
            SiteFamily::Amazon => &AMAZON,
            SiteFamily::Ebay => &EBAY,
            SiteFamily::Walmart => &WALMART,
        }
    }
}

impl fmt::Display for SiteFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SiteFamily::Amazon => "Amazon",
            SiteFamily::Ebay => "eBay",
            SiteFamily::Walmart => "Walmart",
        };
        f.write_str(name)
    }
}
