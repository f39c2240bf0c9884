use crate::app::{AppContext, PriceError, Result};
use crate::domain::{Product, ScrapeResult};
use crate::store::Store;

/// Scrape `url` and start tracking it.
///
/// Rejects URLs that are already tracked and extractions that failed or found
/// no name. A missing price is stored as absent, never guessed.
pub async fn track_product(ctx: &AppContext, url: &str) -> Result<Product> {
    if ctx.store.get_product_by_url(url)?.is_some() {
        return Err(PriceError::DuplicateProduct(url.to_string()));
    }

    let result = ctx.scraper.extract(url).await;
    let name = match (result.success(), result.name()) {
        (true, Some(name)) => name.to_string(),
        _ => return Err(PriceError::Extraction(failure_reason(&result))),
    };

    let product = Product::new(name, url.to_string(), result.price());
    let id = ctx.store.add_product(&product)?;

    if let Some(price) = result.price() {
        ctx.store.record_price(id, price)?;
    }

    let stored = ctx
        .store
        .get_product(id)?
        .ok_or(PriceError::ProductNotFound(id))?;
    tracing::info!("Created product: {}", stored.name);
    Ok(stored)
}

/// Re-scrape a tracked product.
///
/// A new price is recorded in the history; when no price is found the product
/// is left untouched.
pub async fn refresh_product(ctx: &AppContext, id: i64) -> Result<Product> {
    let product = ctx
        .store
        .get_product(id)?
        .ok_or(PriceError::ProductNotFound(id))?;

    let result = ctx.scraper.extract(&product.url).await;
    if !result.success() {
        return Err(PriceError::Extraction(failure_reason(&result)));
    }

    match result.price() {
        Some(price) => {
            ctx.store.record_price(id, price)?;
            let updated = ctx
                .store
                .get_product(id)?
                .ok_or(PriceError::ProductNotFound(id))?;
            tracing::info!("Updated product: {} - New price: {}", updated.name, price);
            Ok(updated)
        }
        None => {
            tracing::warn!("No price found for {}, keeping previous value", product.url);
            Ok(product)
        }
    }
}

fn failure_reason(result: &ScrapeResult) -> String {
    result
        .error()
        .map(String::from)
        .unwrap_or_else(|| "no product name found".to_string())
}

pub async fn add_product(ctx: &AppContext, url: &str) -> Result<()> {
    let product = track_product(ctx, url).await?;
    println!("Added product #{}: {}", product.id, product.name);
    println!("  Price: {}", product.display_price());
    Ok(())
}

pub fn list_products(ctx: &AppContext) -> Result<()> {
    let products = ctx.store.get_all_products()?;

    if products.is_empty() {
        println!("No products");
        return Ok(());
    }

    for product in products {
        println!(
            "#{} {} ({})\n  {}",
            product.id,
            product.name,
            product.display_price(),
            product.url
        );
    }

    Ok(())
}

pub fn show_product(ctx: &AppContext, id: i64) -> Result<()> {
    let product = ctx
        .store
        .get_product(id)?
        .ok_or(PriceError::ProductNotFound(id))?;

    println!("#{} {}", product.id, product.name);
    println!("  URL:          {}", product.url);
    println!("  Price:        {}", product.display_price());
    println!("  Last updated: {}", product.last_updated.format("%Y-%m-%d %H:%M"));
    println!("  Tracked since {}", product.created_at.format("%Y-%m-%d"));

    let history = ctx.store.get_price_history(id, true)?;
    if !history.is_empty() {
        println!("  History:");
        for point in history {
            println!("    {} {:.2}", point.timestamp.format("%Y-%m-%d %H:%M"), point.price);
        }
    }

    Ok(())
}

pub async fn update_products(ctx: &AppContext, id: Option<i64>) -> Result<()> {
    let ids = match id {
        Some(id) => vec![id],
        None => ctx.store.get_all_products()?.into_iter().map(|p| p.id).collect(),
    };

    if ids.is_empty() {
        println!("No products to update");
        return Ok(());
    }

    let mut errors = 0;
    for id in &ids {
        match refresh_product(ctx, *id).await {
            Ok(product) => println!("  #{} {}: {}", product.id, product.name, product.display_price()),
            Err(e) => {
                errors += 1;
                eprintln!("  Error updating #{}: {}", id, e);
            }
        }
    }

    if let (Some(id), true) = (id, errors > 0) {
        return Err(PriceError::Other(format!("Update of product #{} failed", id)));
    }

    println!("Update complete: {} products, {} errors", ids.len(), errors);
    Ok(())
}

pub fn remove_product(ctx: &AppContext, id: i64) -> Result<()> {
    let product = ctx
        .store
        .get_product(id)?
        .ok_or(PriceError::ProductNotFound(id))?;

    ctx.store.delete_product(id)?;
    tracing::info!("Deleted product: {}", product.name);
    println!("Removed product: {}", product.name);
    Ok(())
}

pub fn price_history(ctx: &AppContext, id: i64) -> Result<()> {
    if ctx.store.get_product(id)?.is_none() {
        return Err(PriceError::ProductNotFound(id));
    }

    let history = ctx.store.get_price_history(id, false)?;
    if history.is_empty() {
        println!("No price history");
        return Ok(());
    }

    for point in history {
        println!("{} {:.2}", point.timestamp.to_rfc3339(), point.price);
    }

    Ok(())
}

pub async fn extract_url(ctx: &AppContext, url: &str) -> Result<()> {
    let result = ctx.scraper.extract(url).await;
    let json = serde_json::to_string_pretty(&result)
        .map_err(|e| PriceError::Other(format!("Failed to encode result: {}", e)))?;
    println!("{}", json);
    Ok(())
}
