use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub url: String,
    pub current_price: Option<f64>,
    pub last_updated: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Product {
    pub fn new(name: String, url: String, current_price: Option<f64>) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            name,
            url,
            current_price,
            last_updated: now,
            created_at: now,
        }
    }

    pub fn display_price(&self) -> String {
        self.current_price
            .map(|p| format!("{:.2}", p))
            .unwrap_or_else(|| "-".to_string())
    }
}

/// One recorded observation of a product's price
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricePoint {
    pub id: i64,
    pub product_id: i64,
    pub price: f64,
    pub timestamp: DateTime<Utc>,
}
