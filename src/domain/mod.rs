pub mod product;
pub mod result;

pub use product::{PricePoint, Product};
pub use result::{Completeness, ExtractionRequest, ScrapeResult};
