//! # pricehound
//!
//! Extracts a product's name and current price from e-commerce product pages
//! and tracks prices over time.
//!
//! ## Architecture
//!
//! ```text
//! URL → Router ─ known site ─→ Fetcher → Extractor ─┐
//!          │                                         ├→ ScrapeResult → Store
//!          └─ unknown / incomplete ──→ Renderer ─────┘
//! ```
//!
//! - [`router`]: classifies the URL and escalates to rendering when needed
//! - [`extractor`]: per-site selector ladders over static markup
//! - [`render`]: headless Chrome fallback for client-rendered pages
//! - [`normalizer`]: price text to number
//! - [`store`]: SQLite persistence for products and price history
//!
//! ## Quick Start
//!
//! ```bash
//! # Track a product
//! pricehound add https://www.amazon.com/dp/B08N5WRWNW
//!
//! # Refresh all prices
//! pricehound update
//!
//! # One-off extraction as JSON
//! pricehound extract https://www.walmart.com/ip/12345
//! ```

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together the store and
/// the [`PriceScraper`](router::PriceScraper).
pub mod app;

/// Configuration file loading.
///
/// Loads from `~/.config/pricehound/config.toml`, with `[fetcher]` and
/// `[render]` sections.
pub mod config;

/// Command-line interface using clap.
///
/// - `add <url>` - Track a product
/// - `list` - List tracked products
/// - `show <id>` - Product details and history
/// - `update [id]` - Re-scrape prices
/// - `remove <id>` - Stop tracking a product
/// - `history <id>` - Price history
/// - `extract <url>` - One-shot extraction
pub mod cli;

/// Core domain models.
///
/// - [`ScrapeResult`](domain::ScrapeResult): outcome of one extraction
/// - [`Product`](domain::Product) and [`PricePoint`](domain::PricePoint): tracked data
pub mod domain;

/// Structured extraction with per-site selector tables.
pub mod extractor;

/// Static page fetching.
///
/// - [`PageFetcher`](fetcher::PageFetcher): Async trait for page fetching
/// - [`HttpFetcher`](fetcher::HttpFetcher): reqwest-based implementation
pub mod fetcher;

/// Price text normalization.
pub mod normalizer;

/// Headless browser fallback.
///
/// - [`Renderer`](render::Renderer): Async trait the router escalates to
/// - [`DynamicRenderer`](render::DynamicRenderer): generic ladder over a browser session
/// - [`ChromeDriver`](render::ChromeDriver): chromiumoxide-based browser launcher
pub mod render;

/// Site routing and escalation between static extraction and rendering.
pub mod router;

/// SQLite persistence layer.
///
/// - [`Store`](store::Store): Trait defining storage operations
/// - [`SqliteStore`](store::SqliteStore): SQLite implementation
pub mod store;
