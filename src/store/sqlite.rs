use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use rusqlite_migration::{Migrations, M};

use crate::app::{PriceError, Result};
use crate::domain::{PricePoint, Product};
use crate::store::Store;

const PRODUCT_COLUMNS: &str = "id, name, url, current_price, last_updated, created_at";

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.run_migrations()?;
        Ok(store)
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.run_migrations()?;
        Ok(store)
    }

    fn run_migrations(&self) -> Result<()> {
        let migrations = Migrations::new(vec![M::up(include_str!(
            "../../migrations/001-initial/up.sql"
        ))]);

        let mut conn = self.lock()?;

        conn.execute("PRAGMA foreign_keys = ON", [])?;
        migrations
            .to_latest(&mut conn)
            .map_err(|_| PriceError::Database(rusqlite::Error::InvalidQuery))?;

        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|e| {
            PriceError::Database(rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error::new(1),
                Some(e.to_string()),
            ))
        })
    }

    fn format_datetime(dt: &DateTime<Utc>) -> String {
        dt.to_rfc3339_opts(SecondsFormat::Micros, true)
    }

    fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| s.parse::<DateTime<Utc>>().ok())
    }

    fn product_from_row(row: &Row<'_>) -> rusqlite::Result<Product> {
        Ok(Product {
            id: row.get(0)?,
            name: row.get(1)?,
            url: row.get(2)?,
            current_price: row.get(3)?,
            last_updated: row
                .get::<_, String>(4)
                .ok()
                .and_then(|s| Self::parse_datetime(&s))
                .unwrap_or_else(Utc::now),
            created_at: row
                .get::<_, String>(5)
                .ok()
                .and_then(|s| Self::parse_datetime(&s))
                .unwrap_or_else(Utc::now),
        })
    }
}

impl Store for SqliteStore {
    fn add_product(&self, product: &Product) -> Result<i64> {
        let conn = self.lock()?;

        conn.execute(
            "INSERT INTO products (name, url, current_price, last_updated, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                product.name,
                product.url,
                product.current_price,
                Self::format_datetime(&product.last_updated),
                Self::format_datetime(&product.created_at)
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    fn get_product(&self, id: i64) -> Result<Option<Product>> {
        let conn = self.lock()?;

        let result = conn
            .query_row(
                &format!("SELECT {} FROM products WHERE id = ?1", PRODUCT_COLUMNS),
                params![id],
                Self::product_from_row,
            )
            .optional()?;

        Ok(result)
    }

    fn get_product_by_url(&self, url: &str) -> Result<Option<Product>> {
        let conn = self.lock()?;

        let result = conn
            .query_row(
                &format!("SELECT {} FROM products WHERE url = ?1", PRODUCT_COLUMNS),
                params![url],
                Self::product_from_row,
            )
            .optional()?;

        Ok(result)
    }

    fn get_all_products(&self) -> Result<Vec<Product>> {
        let conn = self.lock()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM products ORDER BY id",
            PRODUCT_COLUMNS
        ))?;

        let products = stmt
            .query_map([], Self::product_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(products)
    }

    fn delete_product(&self, id: i64) -> Result<()> {
        let conn = self.lock()?;

        let deleted = conn.execute("DELETE FROM products WHERE id = ?1", params![id])?;
        if deleted == 0 {
            return Err(PriceError::ProductNotFound(id));
        }
        Ok(())
    }

    fn record_price(&self, product_id: i64, price: f64) -> Result<()> {
        let mut conn = self.lock()?;
        let now = Self::format_datetime(&Utc::now());

        let tx = conn.transaction()?;
        let updated = tx.execute(
            "UPDATE products SET current_price = ?1, last_updated = ?2 WHERE id = ?3",
            params![price, now, product_id],
        )?;
        if updated == 0 {
            return Err(PriceError::ProductNotFound(product_id));
        }

        tx.execute(
            "INSERT INTO price_history (product_id, price, timestamp) VALUES (?1, ?2, ?3)",
            params![product_id, price, now],
        )?;
        tx.commit()?;

        Ok(())
    }

    fn get_price_history(&self, product_id: i64, newest_first: bool) -> Result<Vec<PricePoint>> {
        let conn = self.lock()?;

        let order = if newest_first { "DESC" } else { "ASC" };
        let mut stmt = conn.prepare(&format!(
            "SELECT id, product_id, price, timestamp FROM price_history
             WHERE product_id = ?1 ORDER BY timestamp {order}, id {order}"
        ))?;

        let points = stmt
            .query_map(params![product_id], |row| {
                Ok(PricePoint {
                    id: row.get(0)?,
                    product_id: row.get(1)?,
                    price: row.get(2)?,
                    timestamp: row
                        .get::<_, String>(3)
                        .ok()
                        .and_then(|s| Self::parse_datetime(&s))
                        .unwrap_or_else(Utc::now),
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(url: &str) -> Product {
        Product::new("Echo Dot".into(), url.into(), Some(49.99))
    }

    #[test]
    fn test_add_and_get_product() {
        let store = SqliteStore::in_memory().unwrap();
        let id = store.add_product(&product("https://www.amazon.com/dp/1")).unwrap();

        let retrieved = store.get_product(id).unwrap().unwrap();
        assert_eq!(retrieved.id, id);
        assert_eq!(retrieved.name, "Echo Dot");
        assert_eq!(retrieved.url, "https://www.amazon.com/dp/1");
        assert_eq!(retrieved.current_price, Some(49.99));
    }

    #[test]
    fn test_product_without_price() {
        let store = SqliteStore::in_memory().unwrap();
        let mut p = product("https://www.ebay.com/itm/2");
        p.current_price = None;
        let id = store.add_product(&p).unwrap();

        let retrieved = store.get_product(id).unwrap().unwrap();
        assert_eq!(retrieved.current_price, None);
    }

    #[test]
    fn test_get_product_by_url() {
        let store = SqliteStore::in_memory().unwrap();
        store.add_product(&product("https://www.amazon.com/dp/1")).unwrap();

        assert!(store.get_product_by_url("https://www.amazon.com/dp/1").unwrap().is_some());
        assert!(store.get_product_by_url("https://www.amazon.com/dp/9").unwrap().is_none());
    }

    #[test]
    fn test_duplicate_url_rejected() {
        let store = SqliteStore::in_memory().unwrap();
        store.add_product(&product("https://www.amazon.com/dp/1")).unwrap();

        let result = store.add_product(&product("https://www.amazon.com/dp/1"));
        assert!(matches!(result, Err(PriceError::Database(_))));
    }

    #[test]
    fn test_get_all_products_in_insertion_order() {
        let store = SqliteStore::in_memory().unwrap();
        store.add_product(&product("https://b.example.com/")).unwrap();
        store.add_product(&product("https://a.example.com/")).unwrap();

        let products = store.get_all_products().unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].url, "https://b.example.com/");
        assert_eq!(products[1].url, "https://a.example.com/");
    }

    #[test]
    fn test_record_price_updates_product_and_history() {
        let store = SqliteStore::in_memory().unwrap();
        let id = store.add_product(&product("https://www.amazon.com/dp/1")).unwrap();
        let before = store.get_product(id).unwrap().unwrap();

        store.record_price(id, 45.0).unwrap();
        store.record_price(id, 39.5).unwrap();

        let after = store.get_product(id).unwrap().unwrap();
        assert_eq!(after.current_price, Some(39.5));
        assert!(after.last_updated >= before.last_updated);
        assert_eq!(after.created_at, before.created_at);

        let oldest_first = store.get_price_history(id, false).unwrap();
        let prices: Vec<f64> = oldest_first.iter().map(|p| p.price).collect();
        assert_eq!(prices, vec![45.0, 39.5]);

        let newest_first = store.get_price_history(id, true).unwrap();
        let prices: Vec<f64> = newest_first.iter().map(|p| p.price).collect();
        assert_eq!(prices, vec![39.5, 45.0]);
    }

    #[test]
    fn test_record_price_unknown_product() {
        let store = SqliteStore::in_memory().unwrap();
        let result = store.record_price(42, 1.0);
        assert!(matches!(result, Err(PriceError::ProductNotFound(42))));
        assert!(store.get_price_history(42, false).unwrap().is_empty());
    }

    #[test]
    fn test_delete_product_cascades_history() {
        let store = SqliteStore::in_memory().unwrap();
        let id = store.add_product(&product("https://www.amazon.com/dp/1")).unwrap();
        store.record_price(id, 10.0).unwrap();

        store.delete_product(id).unwrap();

        assert!(store.get_product(id).unwrap().is_none());
        assert!(store.get_price_history(id, false).unwrap().is_empty());
    }

    #[test]
    fn test_delete_nonexistent_product() {
        let store = SqliteStore::in_memory().unwrap();
        assert!(matches!(
            store.delete_product(7),
            Err(PriceError::ProductNotFound(7))
        ));
    }

    #[test]
    fn test_on_disk_store_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prices.db");

        let id = {
            let store = SqliteStore::new(&path).unwrap();
            store.add_product(&product("https://www.walmart.com/ip/3")).unwrap()
        };

        let store = SqliteStore::new(&path).unwrap();
        let retrieved = store.get_product(id).unwrap().unwrap();
        assert_eq!(retrieved.url, "https://www.walmart.com/ip/3");
    }
}
