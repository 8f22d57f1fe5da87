//! Export Walker - Link Traversal & Per-Item Export Automation
//!
//! This crate drives a browser session over a page's link list: each link is
//! visited once, its content is allowed to settle, an export control is
//! activated, and the resulting download is awaited through the filesystem.
//!
//! # Architecture
//!
//! ```text
//! CLI ──▶ Browser Controller (CDP) ──▶ Page Driver (capability surface)
//!                                             │
//!                                             ▼
//!                                      Traversal Loop
//!                          ┌───────┬──────────┼──────────┬─────────┐
//!                          ▼       ▼          ▼          ▼         ▼
//!                       Select   Click      Export    Download   Return
//!                      (labels) (fallback) (trigger)  (settle)   (back)
//! ```
//!
//! The traversal engine consumes the [`browser::PageDriver`] trait rather
//! than the CDP client directly, so the selection and orchestration logic is
//! testable without a live session.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use export_walker::browser::{BrowserController, CdpDriver};
//! use export_walker::config::RunConfig;
//! use export_walker::engine::TraversalLoop;
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RunConfig::load(Path::new("automation_config.json"))?;
//!     let controller =
//!         BrowserController::launch(config.browser.clone(), &config.download_dir).await?;
//!
//!     let driver = CdpDriver::new(controller.start_page().await?);
//!     let mut traversal = TraversalLoop::new(&driver, &config)?;
//!     let summary = traversal.run().await;
//!
//!     controller.close().await?;
//!     println!("Processed {} link(s)", summary?.processed.len());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod browser;
pub mod config;
pub mod engine;
pub mod error;
pub mod locator;
pub mod wait;

// Re-exports for convenience
pub use browser::{BrowserController, CdpDriver, PageDriver};
pub use config::RunConfig;
pub use engine::{RunSummary, TraversalLoop, TraversalState};
pub use error::{Error, Result};
pub use locator::{Locator, LocatorKind};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
