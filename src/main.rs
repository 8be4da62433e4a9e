use anyhow::Context;
use api_client::{GateClient, Gateway};
use clap::{Parser, Subcommand};
use engine::Rebalancer;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// The main entry point for the portfolio rebalancing service.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from a .env file if present; credentials may
    // live there instead of in config.toml.
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let config = configuration::load_config().context("Failed to load config.toml")?;
    let gateway: Arc<dyn Gateway> = Arc::new(GateClient::new(&config.api));

    match cli.command {
        Commands::Run => {
            if !config.api.is_configured() {
                anyhow::bail!(
                    "API key and secret are not configured; set them in config.toml or via REBALANCER__API__KEY / REBALANCER__API__SECRET"
                );
            }
            let rebalancer = Rebalancer::new(config, gateway);
            rebalancer.run().await?;
        }
        Commands::Status => {
            let rebalancer = Rebalancer::new(config, gateway);
            rebalancer.print_status().await?;
        }
    }

    Ok(())
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// A margin-aware rebalancer for a leveraged perpetual-futures account.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the polling loop: check both rebalance triggers every interval.
    Run,
    /// Fetch the account once and print the current vs target allocation.
    Status,
}
