//! Export Walker CLI
//!
//! Loads the run configuration, launches the browser session, drives the
//! traversal, and shuts the browser down on every exit path.

use anyhow::Context;
use clap::Parser;
use export_walker::browser::{BrowserController, CdpDriver};
use export_walker::config::RunConfig;
use export_walker::engine::{RunSummary, TraversalLoop};
use std::path::PathBuf;

/// Walk a page's link list and trigger a per-item export
#[derive(Parser, Debug)]
#[command(name = "export-walker")]
#[command(version)]
#[command(about = "Visit each link on a page once and trigger its export action")]
struct Args {
    /// Path to the JSON run configuration
    #[arg(short, long, default_value = "automation_config.json")]
    config: PathBuf,

    /// Force headless mode regardless of the config file
    #[arg(long)]
    headless: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut config = RunConfig::load(&args.config)
        .with_context(|| format!("loading configuration from {}", args.config.display()))?;
    if args.headless {
        config.browser.headless = true;
    }

    let controller = BrowserController::launch(config.browser.clone(), &config.download_dir)
        .await
        .context("launching browser session")?;

    // The browser must be shut down whether or not the run succeeds, so the
    // run result is held until close() has happened.
    let run_result = run_traversal(&controller, &config).await;

    if let Err(e) = controller.close().await {
        tracing::warn!("Browser shutdown failed: {}", e);
    }

    let summary = run_result.context("automation run failed")?;
    tracing::info!(
        "Run complete: {} link(s) processed in {} cycle(s)",
        summary.processed.len(),
        summary.cycles
    );
    Ok(())
}

async fn run_traversal(
    controller: &BrowserController,
    config: &RunConfig,
) -> export_walker::Result<RunSummary> {
    let page = controller.start_page().await?;
    let driver = CdpDriver::new(page);
    let mut traversal = TraversalLoop::new(&driver, config)?;
    traversal.run().await
}
