pub mod sqlite;

use crate::app::Result;
use crate::domain::{PricePoint, Product};

pub use sqlite::SqliteStore;

pub trait Store {
    // Product operations
    fn add_product(&self, product: &Product) -> Result<i64>;
    fn get_product(&self, id: i64) -> Result<Option<Product>>;
    fn get_product_by_url(&self, url: &str) -> Result<Option<Product>>;
    fn get_all_products(&self) -> Result<Vec<Product>>;
    fn delete_product(&self, id: i64) -> Result<()>;

    /// Set the current price and append it to the history
    fn record_price(&self, product_id: i64, price: f64) -> Result<()>;

    // History operations
    fn get_price_history(&self, product_id: i64, newest_first: bool) -> Result<Vec<PricePoint>>;
}
