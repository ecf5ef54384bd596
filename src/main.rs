// Market sweep binary
//
// Sweeps the listing pages once (plus configured restarts) and appends every
// new listing to the output CSV. Ctrl-C stops after the in-flight page.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use kodegen_tools_marketscrape::{BarProgress, ShutdownSignal, SweepStatus, sweep};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging with chromiumoxide spam reduction
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
                .add_directive("chromiumoxide::handler=off".parse()?)
                .add_directive("chromiumoxide::conn=off".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let cli = cli::Cli::parse();
    let quiet = cli.quiet;
    let json = cli.json;
    let config = cli.into_config().context("Invalid sweep configuration")?;

    info!(
        "Collecting {} unique skins from {} into {}",
        config.target(),
        config.base_url(),
        config.output_path().display()
    );

    let shutdown = ShutdownSignal::new();
    shutdown.trigger_on_ctrl_c();

    let progress = if quiet {
        BarProgress::hidden()
    } else {
        BarProgress::new(config.target())
    };

    let outcome = sweep(config, progress, shutdown).await?;

    match outcome.status {
        SweepStatus::TargetReached => info!(
            "Scraping complete. Total unique skins: {}",
            outcome.unique_count
        ),
        SweepStatus::Exhausted { .. } => info!(
            "Scraping stopped at {} unique skins, {} short of {}",
            outcome.unique_count, outcome.shortfall, outcome.target
        ),
        SweepStatus::Aborted => info!(
            "Scraping aborted at {} unique skins",
            outcome.unique_count
        ),
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    }

    Ok(())
}
