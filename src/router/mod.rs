//! Site routing and escalation.
//!
//! One extraction walks a small state machine:
//!
//! ```text
//! Start ─ known family ──→ Primary (fetch + selector ladder) ─→ Evaluate
//!   │                                                             │
//!   └─ unknown family ──────────────→ Fallback (render) ←─ incomplete
//!                                          │
//!                                          └→ Done (best of at most two results)
//! ```
//!
//! A complete static result is returned without rendering. A rendered
//! result only replaces the static one when it is complete.

use std::sync::Arc;

use crate::domain::{Completeness, ExtractionRequest, ScrapeResult};
use crate::extractor::{extract_fields, SiteFamily};
use crate::fetcher::PageFetcher;
use crate::render::Renderer;

enum Stage {
    Start(ExtractionRequest),
    Primary(ExtractionRequest, SiteFamily),
    Evaluate(ExtractionRequest, ScrapeResult),
    Fallback(ExtractionRequest, Option<ScrapeResult>),
    Done(ScrapeResult),
}

/// Extracts product name and price from any product page URL
#[derive(Clone)]
pub struct PriceScraper {
    fetcher: Arc<dyn PageFetcher + Send + Sync>,
    renderer: Arc<dyn Renderer + Send + Sync>,
}

impl PriceScraper {
    pub fn new(
        fetcher: Arc<dyn PageFetcher + Send + Sync>,
        renderer: Arc<dyn Renderer + Send + Sync>,
    ) -> Self {
        Self { fetcher, renderer }
    }

    /// Extract name and price from `url`.
    ///
    /// Never fails; transport and render errors end up in the result.
    pub async fn extract(&self, url: &str) -> ScrapeResult {
        let request = match ExtractionRequest::parse(url) {
            Ok(request) => request,
            Err(e) => {
                tracing::warn!("Rejecting {}: {}", url, e);
                return ScrapeResult::failed(e.to_string());
            }
        };

        let mut stage = Stage::Start(request);
        loop {
            stage = match stage {
                Stage::Start(request) => match SiteFamily::classify(&request.host()) {
                    Some(family) => Stage::Primary(request, family),
                    None => {
                        tracing::info!("No site family for {}, rendering", request.host());
                        Stage::Fallback(request, None)
                    }
                },
                Stage::Primary(request, family) => {
                    let result = self.scrape_static(&request, family).await;
                    Stage::Evaluate(request, result)
                }
                Stage::Evaluate(request, primary) => match primary.completeness() {
                    Completeness::Complete => Stage::Done(primary),
                    Completeness::Partial | Completeness::Failed => {
                        tracing::info!("Trying browser fallback for {}", request.as_str());
                        Stage::Fallback(request, Some(primary))
                    }
                },
                Stage::Fallback(request, primary) => {
                    let rendered = self.renderer.render(request.as_str()).await;
                    Stage::Done(choose(primary, rendered))
                }
                Stage::Done(result) => return result,
            };
        }
    }

    async fn scrape_static(&self, request: &ExtractionRequest, family: SiteFamily) -> ScrapeResult {
        match self.fetcher.fetch(request.as_str()).await {
            Ok(markup) => {
                let fields = extract_fields(&markup, family.selectors());
                tracing::debug!(
                    "{} static extraction: name={} price={:?}",
                    family,
                    fields.name.is_some(),
                    fields.price
                );
                ScrapeResult::extracted(fields.name, fields.price)
            }
            Err(e) => {
                tracing::warn!("Error scraping {}: {}", family, e);
                ScrapeResult::failed(e.to_string())
            }
        }
    }
}

/// Keep the primary result unless the rendered one is complete
fn choose(primary: Option<ScrapeResult>, rendered: ScrapeResult) -> ScrapeResult {
    match primary {
        Some(primary) if !rendered.is_complete() => primary,
        _ => rendered,
    }
}
