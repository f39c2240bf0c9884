use std::path::PathBuf;
use std::sync::Arc;

use crate::app::error::{PriceError, Result};
use crate::config::Config;
use crate::fetcher::{HttpFetcher, PageFetcher};
use crate::render::{DynamicRenderer, Renderer};
use crate::router::PriceScraper;
use crate::store::sqlite::SqliteStore;

pub struct AppContext {
    pub store: Arc<SqliteStore>,
    pub scraper: PriceScraper,
}

impl AppContext {
    pub fn new(db_path: Option<PathBuf>, config: &Config) -> Result<Self> {
        let db_path = match db_path.or_else(|| config.database.clone()) {
            Some(p) => p,
            None => Self::default_db_path()?,
        };

        let store = Arc::new(SqliteStore::new(&db_path)?);
        Self::with_store(store, config)
    }

    pub fn in_memory(config: &Config) -> Result<Self> {
        let store = Arc::new(SqliteStore::in_memory()?);
        Self::with_store(store, config)
    }

    fn with_store(store: Arc<SqliteStore>, config: &Config) -> Result<Self> {
        let fetcher: Arc<dyn PageFetcher + Send + Sync> = Arc::new(HttpFetcher::new(&config.fetcher)?);
        let renderer: Arc<dyn Renderer + Send + Sync> =
            Arc::new(DynamicRenderer::chrome(config.render.clone()));

        Ok(Self {
            store,
            scraper: PriceScraper::new(fetcher, renderer),
        })
    }

    /// Wire a context around an existing store and scraper
    pub fn from_parts(store: Arc<SqliteStore>, scraper: PriceScraper) -> Self {
        Self { store, scraper }
    }

    fn default_db_path() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| PriceError::Config("Could not find data directory".into()))?;
        let app_dir = data_dir.join("pricehound");
        std::fs::create_dir_all(&app_dir)?;
        Ok(app_dir.join("pricehound.db"))
    }
}
