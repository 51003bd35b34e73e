mod analyze;
mod cli;
mod config;
mod extract;
mod insights;
mod web;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing - info by default, use RUST_LOG=debug for more detail
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { host, port } => {
            cli::commands::serve::run(host, port).await?;
        }
        Commands::Extract {
            paths,
            no_insights,
            preserve_layout,
        } => {
            cli::commands::extract::run(paths, no_insights, preserve_layout).await?;
        }
        Commands::Init { force } => {
            cli::commands::init::run(force).await?;
        }
        Commands::Doctor => {
            cli::commands::doctor::run().await?;
        }
    }

    Ok(())
}
