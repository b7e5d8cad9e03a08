use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use izvor::app::AppContext;
use izvor::cli::{commands, Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let ctx = AppContext::new(cli.root)?;

    match cli.command {
        Commands::Feed => {
            commands::generate_feed(&ctx).await?;
        }
        Commands::Sitemap => {
            commands::generate_sitemap(&ctx)?;
        }
        Commands::Pages => {
            commands::render_pages(&ctx)?;
        }
        Commands::Snapshots => {
            commands::update_snapshots(&ctx).await?;
        }
        Commands::All => {
            commands::run_all(&ctx).await?;
        }
    }

    Ok(())
}
