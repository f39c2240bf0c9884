pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "pricehound")]
#[command(about = "Track product prices from e-commerce pages", long_about = None)]
pub struct Cli {
    /// Path to the product database
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Path to the config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start tracking a product page
    Add {
        /// URL of the product page
        url: String,
    },
    /// List tracked products
    List,
    /// Show a product with its price history, newest first
    Show {
        /// Product id
        id: i64,
    },
    /// Re-scrape prices
    Update {
        /// Product id (all products when omitted)
        id: Option<i64>,
    },
    /// Stop tracking a product and drop its history
    Remove {
        /// Product id
        id: i64,
    },
    /// Print a product's price history, oldest first
    History {
        /// Product id
        id: i64,
    },
    /// Extract name and price from a URL without storing anything
    Extract {
        /// URL of the product page
        url: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_add() {
        let cli = Cli::try_parse_from(["pricehound", "add", "https://www.amazon.com/dp/1"]).unwrap();
        assert!(matches!(cli.command, Commands::Add { ref url } if url == "https://www.amazon.com/dp/1"));
        assert!(cli.db.is_none());
    }

    #[test]
    fn test_parse_update_without_id() {
        let cli = Cli::try_parse_from(["pricehound", "update"]).unwrap();
        assert!(matches!(cli.command, Commands::Update { id: None }));
    }

    #[test]
    fn test_parse_global_db_after_subcommand() {
        let cli = Cli::try_parse_from(["pricehound", "show", "3", "--db", "/tmp/p.db"]).unwrap();
        assert!(matches!(cli.command, Commands::Show { id: 3 }));
        assert_eq!(cli.db, Some(PathBuf::from("/tmp/p.db")));
    }

    #[test]
    fn test_parse_rejects_non_numeric_id() {
        assert!(Cli::try_parse_from(["pricehound", "remove", "abc"]).is_err());
    }
}
