use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::handler::viewport::Viewport;
use chromiumoxide::Page;
use futures::StreamExt;
use tokio::task::JoinHandle;

use crate::app::{PriceError, Result};
use crate::render::config::RenderConfig;
use crate::render::{BrowserDriver, BrowserSession};

const BODY_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Launches one headless Chrome process per session via chromiumoxide
pub struct ChromeDriver {
    config: RenderConfig,
}

impl ChromeDriver {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    fn browser_config(&self) -> Result<BrowserConfig> {
        let mut builder = BrowserConfig::builder()
            .arg("--no-sandbox")
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .arg("--no-first-run")
            .window_size(self.config.window_width, self.config.window_height)
            .viewport(Some(Viewport {
                width: self.config.window_width,
                height: self.config.window_height,
                ..Default::default()
            }))
            .request_timeout(self.config.timeout());

        if !self.config.headless {
            builder = builder.with_head();
        }

        builder
            .build()
            .map_err(|e| PriceError::Render(format!("Failed to build browser config: {}", e)))
    }
}

#[async_trait]
impl BrowserDriver for ChromeDriver {
    type Session = ChromeSession;

    async fn launch(&self) -> Result<ChromeSession> {
        let (browser, mut handler) = Browser::launch(self.browser_config()?)
            .await
            .map_err(|e| {
                PriceError::Render(format!(
                    "Failed to launch browser: {}. Is Chrome or Chromium installed and in PATH?",
                    e
                ))
            })?;

        let handler = tokio::spawn(async move {
            while let Some(_event) = handler.next().await {
                // Drive the CDP connection
            }
        });

        tracing::debug!("Launched headless browser");

        Ok(ChromeSession {
            browser,
            handler,
            page: None,
            user_agent: self.config.user_agent.clone(),
        })
    }
}

/// A running browser process and its single page.
///
/// Call [`BrowserSession::close`] to shut the process down. If the session is
/// dropped without closing, chromiumoxide kills the child process and the
/// handler task is aborted here.
pub struct ChromeSession {
    browser: Browser,
    handler: JoinHandle<()>,
    page: Option<Page>,
    user_agent: Option<String>,
}

impl ChromeSession {
    fn page(&self) -> Result<&Page> {
        self.page
            .as_ref()
            .ok_or_else(|| PriceError::Render("No page open".to_string()))
    }
}

#[async_trait]
impl BrowserSession for ChromeSession {
    async fn navigate(&mut self, url: &str) -> Result<()> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| PriceError::Render(format!("Failed to create page: {}", e)))?;

        if let Some(ref ua) = self.user_agent {
            page.set_user_agent(ua)
                .await
                .map_err(|e| PriceError::Render(format!("Failed to set user agent: {}", e)))?;
        }

        page.goto(url)
            .await
            .map_err(|e| PriceError::Render(format!("Navigation failed: {}", e)))?;

        self.page = Some(page);
        Ok(())
    }

    async fn wait_for_body(&mut self) -> Result<()> {
        let page = self.page()?;
        loop {
            if page.find_element("body").await.is_ok() {
                return Ok(());
            }
            tokio::time::sleep(BODY_POLL_INTERVAL).await;
        }
    }

    async fn text_of(&mut self, selector: &str) -> Result<Option<String>> {
        let page = self.page()?;
        let element = page
            .find_element(selector)
            .await
            .map_err(|e| PriceError::Render(format!("No element for {}: {}", selector, e)))?;

        element
            .inner_text()
            .await
            .map_err(|e| PriceError::Render(format!("Failed to read text of {}: {}", selector, e)))
    }

    async fn close(mut self) {
        if let Some(page) = self.page.take() {
            let _ = page.close().await;
        }

        if let Err(e) = self.browser.close().await {
            tracing::warn!("Failed to close browser: {}", e);
        }

        if let Err(e) = self.browser.wait().await {
            tracing::warn!("Failed to wait for browser exit: {}", e);
        }

        self.handler.abort();
        tracing::debug!("Browser closed");
    }
}

impl Drop for ChromeSession {
    fn drop(&mut self) {
        self.handler.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_browser_config_builds() {
        let driver = ChromeDriver::new(RenderConfig::default());
        // Building fails only when no Chrome executable can be located
        if let Err(e) = driver.browser_config() {
            assert!(matches!(e, PriceError::Render(_)));
        }
    }
}
