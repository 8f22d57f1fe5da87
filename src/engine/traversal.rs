//! The traversal loop
//!
//! One cycle processes exactly one link: scan the page for candidates,
//! select the next unvisited one, click it, pause for content, trigger the
//! export, wait for the download to settle, and optionally navigate back.
//! The loop owns the visited set and is the only writer; a label is recorded
//! as visited the moment its click succeeds, so an abort later in the same
//! cycle still counts the link as processed in this run's memory.

use crate::browser::PageDriver;
use crate::config::RunConfig;
use crate::engine::download::await_downloads;
use crate::engine::interact::{click_link, trigger_export};
use crate::engine::select::{pick_next, resolve_candidates};
use crate::error::Result;
use crate::locator::Locator;
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Phase of the traversal cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraversalState {
    /// Re-enumerating candidates from the page
    Scanning,
    /// Running selection over the fresh candidate list
    Selecting,
    /// Clicking the chosen link
    Clicking,
    /// Fixed post-click pause for content to load
    WaitingContent,
    /// Activating the export control
    Exporting,
    /// Waiting for the download directory to settle
    WaitingDownload,
    /// Navigating back to the link list
    Returning,
    /// No eligible candidates remain
    Done,
}

/// Outcome of a completed run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Labels processed, in processing order
    pub processed: Vec<String>,
    /// Number of full cycles executed
    pub cycles: usize,
}

/// The traversal-and-export orchestrator
pub struct TraversalLoop<'a, D: PageDriver> {
    driver: &'a D,
    config: &'a RunConfig,
    export_locator: Locator,
    visited: HashSet<String>,
    processed: Vec<String>,
    state: TraversalState,
}

impl<'a, D: PageDriver> TraversalLoop<'a, D> {
    /// Create a loop over a driver and validated configuration
    pub fn new(driver: &'a D, config: &'a RunConfig) -> Result<Self> {
        let export_locator = config.export_locator()?;
        Ok(Self {
            driver,
            config,
            export_locator,
            visited: HashSet::new(),
            processed: Vec::new(),
            state: TraversalState::Scanning,
        })
    }

    /// Labels visited so far. Grows monotonically; survives an aborted run
    /// on this value, but not across processes.
    pub fn visited(&self) -> &HashSet<String> {
        &self.visited
    }

    /// Current loop state
    pub fn state(&self) -> TraversalState {
        self.state
    }

    /// Open the start page and process links until none remain.
    ///
    /// Fatal errors abort the whole run; there is no per-link retry. Each
    /// cycle re-enumerates candidates, since handles from a prior cycle are
    /// invalid after navigation.
    #[instrument(skip(self))]
    pub async fn run(&mut self) -> Result<RunSummary> {
        info!("Opening start URL: {}", self.config.start_url);
        self.driver.goto(&self.config.start_url).await?;
        self.driver
            .wait_page_ready(self.config.page_ready_timeout())
            .await?;

        let mut cycles = 0;
        loop {
            cycles += 1;
            debug!("Cycle {}: scanning for remaining links", cycles);

            self.state = TraversalState::Scanning;
            let candidates = self.driver.find_links(&self.config.link_selector).await?;

            self.state = TraversalState::Selecting;
            let mut available = resolve_candidates(self.driver, candidates).await;
            let Some(index) = pick_next(&available, &self.visited, self.config.targets()) else {
                self.state = TraversalState::Done;
                info!("No more links to process; traversal complete");
                return Ok(RunSummary {
                    processed: self.processed.clone(),
                    cycles,
                });
            };
            let (element, label) = available.swap_remove(index);

            info!("Processing link: {:?}", label);
            self.state = TraversalState::Clicking;
            click_link(self.driver, &element, &label).await?;
            self.visited.insert(label.clone());
            self.processed.push(label.clone());

            self.state = TraversalState::WaitingContent;
            let settle = self.config.settle();
            if settle > Duration::ZERO {
                debug!("Waiting {}s for content to load", settle.as_secs());
                tokio::time::sleep(settle).await;
            }

            self.state = TraversalState::Exporting;
            trigger_export(
                self.driver,
                &self.export_locator,
                self.config.export_timeout(),
                &label,
            )
            .await?;

            self.state = TraversalState::WaitingDownload;
            let download_timeout = self.config.download_timeout();
            if download_timeout > Duration::ZERO {
                await_downloads(&self.config.download_dir, download_timeout).await?;
            }

            if self.config.navigate_back {
                self.state = TraversalState::Returning;
                debug!("Navigating back to the link list");
                self.driver.back().await?;
                self.driver
                    .wait_page_ready(self.config.page_ready_timeout())
                    .await?;
            }
        }
    }
}
