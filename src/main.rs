//! sitemapper CLI entry point

use anyhow::Result;
use clap::Parser;
use sitemapper::{commands::cmd_generate, config::Config};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "sitemapper")]
#[command(version, about = "Generate a sitemap.xml from a site's rendered link index page", long_about = None)]
struct Cli {
    /// Path to a TOML config file; defaults apply when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the sitemap output path
    #[arg(short, long)]
    output: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    if let Some(output) = cli.output {
        config.output_path = output;
    }

    let stats = cmd_generate(&config).await?;
    info!(
        "Done: {} links found, {} URLs written to {}",
        stats.links_found, stats.urls_written, config.output_path
    );

    Ok(())
}
