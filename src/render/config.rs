use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the browser rendering fallback
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Whether to run the browser in headless mode (default: true)
    pub headless: bool,

    /// Seconds to wait for the page body to appear (default: 10)
    pub timeout_secs: u64,

    /// Browser window and viewport width (default: 1920)
    pub window_width: u32,

    /// Browser window and viewport height (default: 1080)
    pub window_height: u32,

    /// Generic selectors for the product name, in priority order
    pub name_selectors: Vec<String>,

    /// Generic selectors for the product price, in priority order
    pub price_selectors: Vec<String>,

    /// User agent string to use
    pub user_agent: Option<String>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            headless: true,
            timeout_secs: 10,
            window_width: 1920,
            window_height: 1080,
            name_selectors: vec![
                "h1".to_string(),
                "[data-testid*='title']".to_string(),
                ".product-title".to_string(),
                "#productTitle".to_string(),
            ],
            price_selectors: vec![
                "[data-testid*='price']".to_string(),
                ".price".to_string(),
                "[class*='price']".to_string(),
                ".cost".to_string(),
            ],
            user_agent: None,
        }
    }
}

impl RenderConfig {
    /// Get the body readiness timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
