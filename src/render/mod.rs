//! Browser rendering fallback for client-rendered product pages.
//!
//! Static markup misses prices that are filled in by scripts. This module
//! renders the page in a headless browser and runs a generic selector ladder
//! against the live DOM.
//!
//! # Lifecycle
//!
//! ```text
//! launch → navigate → wait for <body> (bounded) → name ladder → price ladder → close
//! ```
//!
//! Every render owns exactly one browser process, and the process is closed
//! on every exit path before [`Renderer::render`] returns.

mod chrome;
mod config;

pub use chrome::{ChromeDriver, ChromeSession};
pub use config::RenderConfig;

use async_trait::async_trait;

use crate::app::{PriceError, Result};
use crate::domain::ScrapeResult;
use crate::normalizer::normalize_price;

/// Produces a [`ScrapeResult`] for a URL by rendering it.
///
/// Never fails: errors are reported through `success = false`.
#[async_trait]
pub trait Renderer {
    async fn render(&self, url: &str) -> ScrapeResult;
}

/// Starts browser processes
#[async_trait]
pub trait BrowserDriver: Send + Sync {
    type Session: BrowserSession;

    async fn launch(&self) -> Result<Self::Session>;
}

/// One live browser process with a single page
#[async_trait]
pub trait BrowserSession: Send {
    async fn navigate(&mut self, url: &str) -> Result<()>;

    /// Resolve once the document body exists. Unbounded; callers apply the timeout.
    async fn wait_for_body(&mut self) -> Result<()>;

    /// Inner text of the first element matching `selector`
    async fn text_of(&mut self, selector: &str) -> Result<Option<String>>;

    /// Shut the browser process down
    async fn close(self);
}

/// Renders pages through a [`BrowserDriver`] and applies the generic ladders
pub struct DynamicRenderer<D: BrowserDriver> {
    driver: D,
    config: RenderConfig,
}

impl DynamicRenderer<ChromeDriver> {
    pub fn chrome(config: RenderConfig) -> Self {
        Self::new(ChromeDriver::new(config.clone()), config)
    }
}

impl<D: BrowserDriver> DynamicRenderer<D> {
    pub fn new(driver: D, config: RenderConfig) -> Self {
        Self { driver, config }
    }

    async fn inspect(&self, session: &mut D::Session, url: &str) -> Result<(Option<String>, Option<f64>)> {
        session.navigate(url).await?;

        tokio::time::timeout(self.config.timeout(), session.wait_for_body())
            .await
            .map_err(|_| {
                PriceError::Render(format!(
                    "Timed out after {}s waiting for page body",
                    self.config.timeout_secs
                ))
            })??;

        let mut name = None;
        for selector in &self.config.name_selectors {
            if let Some(text) = lookup(session, selector).await {
                name = Some(text);
                break;
            }
        }

        let mut price = None;
        for selector in &self.config.price_selectors {
            if let Some(value) = lookup(session, selector).await.and_then(|t| normalize_price(&t)) {
                price = Some(value);
                break;
            }
        }

        Ok((name, price))
    }
}

/// Non-empty trimmed text for `selector`; lookup errors count as no match
async fn lookup<S: BrowserSession>(session: &mut S, selector: &str) -> Option<String> {
    match session.text_of(selector).await {
        Ok(Some(text)) => {
            let text = text.trim();
            if text.is_empty() {
                None
            } else {
                tracing::debug!("Rendered selector {} matched", selector);
                Some(text.to_string())
            }
        }
        Ok(None) => None,
        Err(e) => {
            tracing::debug!("Selector {} skipped: {}", selector, e);
            None
        }
    }
}

#[async_trait]
impl<D: BrowserDriver> Renderer for DynamicRenderer<D> {
    async fn render(&self, url: &str) -> ScrapeResult {
        let mut session = match self.driver.launch().await {
            Ok(session) => session,
            Err(e) => {
                tracing::error!("Error with browser rendering: {}", e);
                return ScrapeResult::failed(e.to_string());
            }
        };

        let outcome = self.inspect(&mut session, url).await;
        session.close().await;

        match outcome {
            Ok((name, price)) => ScrapeResult::extracted(name, price),
            Err(e) => {
                tracing::error!("Error with browser rendering: {}", e);
                ScrapeResult::failed(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct Counters {
        launched: Arc<AtomicUsize>,
        closed: Arc<AtomicUsize>,
    }

    #[derive(Clone, Copy, PartialEq)]
    enum Mode {
        Ok,
        FailLaunch,
        FailNavigate,
        HangBody,
    }

    #[derive(Clone, Copy)]
    enum Node {
        Text(&'static str),
        NoText,
        Broken,
    }

    struct MockDriver {
        counters: Counters,
        mode: Mode,
        dom: HashMap<&'static str, Node>,
    }

    struct MockSession {
        counters: Counters,
        mode: Mode,
        dom: HashMap<&'static str, Node>,
    }

    impl MockDriver {
        fn new(mode: Mode, dom: Vec<(&'static str, Node)>) -> Self {
            Self {
                counters: Counters::default(),
                mode,
                dom: dom.into_iter().collect(),
            }
        }
    }

    #[async_trait]
    impl BrowserDriver for MockDriver {
        type Session = MockSession;

        async fn launch(&self) -> Result<MockSession> {
            if self.mode == Mode::FailLaunch {
                return Err(PriceError::Render("chrome not found".into()));
            }
            self.counters.launched.fetch_add(1, Ordering::SeqCst);

            Ok(MockSession {
                counters: self.counters.clone(),
                mode: self.mode,
                dom: self.dom.clone(),
            })
        }
    }

    #[async_trait]
    impl BrowserSession for MockSession {
        async fn navigate(&mut self, _url: &str) -> Result<()> {
            if self.mode == Mode::FailNavigate {
                return Err(PriceError::Render("net::ERR_NAME_NOT_RESOLVED".into()));
            }
            Ok(())
        }

        async fn wait_for_body(&mut self) -> Result<()> {
            if self.mode == Mode::HangBody {
                std::future::pending::<()>().await;
            }
            Ok(())
        }

        async fn text_of(&mut self, selector: &str) -> Result<Option<String>> {
            match self.dom.get(selector) {
                Some(Node::Text(text)) => Ok(Some(text.to_string())),
                Some(Node::NoText) => Ok(None),
                Some(Node::Broken) => Err(PriceError::Render(format!("stale node: {}", selector))),
                None => Err(PriceError::Render(format!("no node: {}", selector))),
            }
        }

        async fn close(self) {
            self.counters.closed.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn renderer(driver: MockDriver) -> (DynamicRenderer<MockDriver>, Counters) {
        let counters = driver.counters.clone();
        let config = RenderConfig {
            timeout_secs: 1,
            ..Default::default()
        };
        (DynamicRenderer::new(driver, config), counters)
    }

    #[tokio::test]
    async fn test_render_complete() {
        let driver = MockDriver::new(
            Mode::Ok,
            vec![("h1", Node::Text("  Desk Lamp  ")), (".price", Node::Text("$34.99"))],
        );
        let (renderer, counters) = renderer(driver);

        let result = renderer.render("https://shop.example.com/lamp").await;
        assert_eq!(result, ScrapeResult::extracted(Some("Desk Lamp".into()), Some(34.99)));
        assert_eq!(counters.launched.load(Ordering::SeqCst), 1);
        assert_eq!(counters.closed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_lookup_errors_and_blank_text_fall_through() {
        let driver = MockDriver::new(
            Mode::Ok,
            vec![
                ("h1", Node::Text("   ")),
                ("[data-testid*='title']", Node::Broken),
                (".product-title", Node::Text("Kettle")),
                ("[data-testid*='price']", Node::Text("Out of stock")),
                (".price", Node::NoText),
                ("[class*='price']", Node::Text("€19.00")),
            ],
        );
        let (renderer, _) = renderer(driver);

        let result = renderer.render("https://shop.example.com/kettle").await;
        assert_eq!(result.name(), Some("Kettle"));
        assert_eq!(result.price(), Some(19.0));
        assert!(result.success());
    }

    #[tokio::test]
    async fn test_no_match_is_partial_success() {
        let (renderer, counters) = renderer(MockDriver::new(Mode::Ok, vec![]));

        let result = renderer.render("https://shop.example.com/").await;
        assert!(result.success());
        assert_eq!(result.name(), None);
        assert_eq!(result.price(), None);
        assert_eq!(counters.closed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_navigation_failure_reports_error_and_closes() {
        let (renderer, counters) = renderer(MockDriver::new(Mode::FailNavigate, vec![]));

        let result = renderer.render("https://nowhere.invalid/").await;
        assert!(!result.success());
        assert!(result.error().unwrap().contains("ERR_NAME_NOT_RESOLVED"));
        assert_eq!(counters.launched.load(Ordering::SeqCst), 1);
        assert_eq!(counters.closed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_body_timeout_reports_error_and_closes() {
        let (renderer, counters) = renderer(MockDriver::new(Mode::HangBody, vec![]));

        let result = renderer.render("https://slow.example.com/").await;
        assert!(!result.success());
        assert!(result.error().unwrap().contains("Timed out"));
        assert_eq!(counters.launched.load(Ordering::SeqCst), 1);
        assert_eq!(counters.closed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_launch_failure_has_nothing_to_close() {
        let (renderer, counters) = renderer(MockDriver::new(Mode::FailLaunch, vec![]));

        let result = tokio_test::block_on(renderer.render("https://shop.example.com/"));
        assert!(!result.success());
        assert!(result.error().unwrap().contains("chrome not found"));
        assert_eq!(counters.launched.load(Ordering::SeqCst), 0);
        assert_eq!(counters.closed.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_repeated_renders_balance_launch_and_close() {
        let driver = MockDriver::new(Mode::Ok, vec![("h1", Node::Text("Thing"))]);
        let (renderer, counters) = renderer(driver);

        for _ in 0..3 {
            renderer.render("https://shop.example.com/thing").await;
        }
        assert_eq!(counters.launched.load(Ordering::SeqCst), 3);
        assert_eq!(counters.closed.load(Ordering::SeqCst), 3);
    }
}
