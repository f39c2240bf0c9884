use thiserror::Error;

#[derive(Error, Debug)]
pub enum PriceError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Unsupported URL scheme: {0}")]
    UnsupportedScheme(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Failed to scrape product: {0}")]
    Extraction(String),

    #[error("Product not found: {0}")]
    ProductNotFound(i64),

    #[error("Product with this URL already exists: {0}")]
    DuplicateProduct(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, PriceError>;
