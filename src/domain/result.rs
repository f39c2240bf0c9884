use serde::{Deserialize, Serialize};
use url::Url;

use crate::app::{PriceError, Result};

/// A single extraction call's target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionRequest {
    url: Url,
}

impl ExtractionRequest {
    /// Parse and validate an absolute http(s) URL
    pub fn parse(url: &str) -> Result<Self> {
        let url = Url::parse(url.trim())?;
        match url.scheme() {
            "http" | "https" => Ok(Self { url }),
            other => Err(PriceError::UnsupportedScheme(other.to_string())),
        }
    }

    /// Lowercased host, empty when the URL has none
    pub fn host(&self) -> String {
        self.url
            .host_str()
            .map(|h| h.to_ascii_lowercase())
            .unwrap_or_default()
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }
}

/// How usable a [`ScrapeResult`] is for the escalation policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completeness {
    /// Extraction ran and found both name and price
    Complete,
    /// Extraction ran but name or price is missing
    Partial,
    /// Extraction hit a transport or render error
    Failed,
}

/// Outcome of one extraction attempt.
///
/// Fields are private so that a failed result can never carry a name or price.
/// Deserialization goes through the same check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawScrapeResult")]
pub struct ScrapeResult {
    name: Option<String>,
    price: Option<f64>,
    success: bool,
    error: Option<String>,
}

impl ScrapeResult {
    /// An attempt that ran to completion, whatever it found
    pub fn extracted(name: Option<String>, price: Option<f64>) -> Self {
        Self {
            name,
            price,
            success: true,
            error: None,
        }
    }

    /// An attempt aborted by a transport or render error
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            name: None,
            price: None,
            success: false,
            error: Some(error.into()),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn price(&self) -> Option<f64> {
        self.price
    }

    pub fn success(&self) -> bool {
        self.success
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn completeness(&self) -> Completeness {
        if !self.success {
            Completeness::Failed
        } else if self.name.is_some() && self.price.is_some() {
            Completeness::Complete
        } else {
            Completeness::Partial
        }
    }

    pub fn is_complete(&self) -> bool {
        self.completeness() == Completeness::Complete
    }
}

#[derive(Deserialize)]
struct RawScrapeResult {
    name: Option<String>,
    price: Option<f64>,
    success: bool,
    error: Option<String>,
}

impl TryFrom<RawScrapeResult> for ScrapeResult {
    type Error = String;

    fn try_from(raw: RawScrapeResult) -> std::result::Result<Self, Self::Error> {
        match (raw.success, raw.error) {
            (true, None) => Ok(Self::extracted(raw.name, raw.price)),
            (true, Some(_)) => Err("successful result cannot carry an error".to_string()),
            (false, Some(error)) if raw.name.is_none() && raw.price.is_none() => Ok(Self::failed(error)),
            (false, Some(_)) => Err("failed result cannot carry a name or price".to_string()),
            (false, None) => Err("failed result needs an error".to_string()),
        }
    }
}
