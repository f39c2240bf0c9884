use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use pricehound::app::AppContext;
use pricehound::cli::{commands, Cli, Commands};
use pricehound::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = match cli.config {
        Some(ref path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let ctx = AppContext::new(cli.db, &config)?;

    match cli.command {
        Commands::Add { url } => {
            commands::add_product(&ctx, &url).await?;
        }
        Commands::List => {
            commands::list_products(&ctx)?;
        }
        Commands::Show { id } => {
            commands::show_product(&ctx, id)?;
        }
        Commands::Update { id } => {
            commands::update_products(&ctx, id).await?;
        }
        Commands::Remove { id } => {
            commands::remove_product(&ctx, id)?;
        }
        Commands::History { id } => {
            commands::price_history(&ctx, id)?;
        }
        Commands::Extract { url } => {
            commands::extract_url(&ctx, &url).await?;
        }
    }

    Ok(())
}
