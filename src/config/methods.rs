//! Builder methods available for all states
//!
//! This module contains methods that can be called on the builder
//! regardless of its current type state.

use std::path::PathBuf;

use super::builder::SweepConfigBuilder;
use crate::page_fetcher::DelayRange;
use crate::record_extractor::ExtractionRules;

impl<State> SweepConfigBuilder<State> {
    /// Set the number of unique records after which the run stops
    ///
    /// A target of 0 is already reached; the run ends before the first fetch.
    #[must_use]
    pub fn target(mut self, target: usize) -> Self {
        self.target = target;
        self
    }

    #[must_use]
    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Set the page window of one sweep
    ///
    /// Match this to the site's known page count. Sweeping past the last page
    /// only returns empty grids, so the orchestrator restarts from page 0
    /// instead (see [`max_sweeps`](Self::max_sweeps)).
    #[must_use]
    pub fn max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Set the total number of sweeps, the first one included
    ///
    /// # Example
    ///
    /// ```rust
    /// # use kodegen_tools_marketscrape::config::SweepConfig;
    /// # fn main() -> anyhow::Result<()> {
    /// let config = SweepConfig::builder()
    ///     .base_url("https://steamcommunity.com/market/search?appid=730")
    ///     .output_path("skins.csv")
    ///     .max_sweeps(1) // never restart
    ///     .build()?;
    /// assert_eq!(config.max_sweeps(), 1);
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn max_sweeps(mut self, max_sweeps: u32) -> Self {
        self.max_sweeps = max_sweeps;
        self
    }

    /// Set attempts per page (1 = no retry)
    #[must_use]
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    #[must_use]
    pub fn page_load_timeout_secs(mut self, secs: u64) -> Self {
        self.page_load_timeout_secs = secs;
        self
    }

    #[must_use]
    pub fn marker_timeout_secs(mut self, secs: u64) -> Self {
        self.marker_timeout_secs = secs;
        self
    }

    #[must_use]
    pub fn marker_selector(mut self, selector: impl Into<String>) -> Self {
        self.marker_selector = Some(selector.into());
        self
    }

    #[must_use]
    pub fn settle_delay(mut self, range: DelayRange) -> Self {
        self.settle_delay = range;
        self
    }

    #[must_use]
    pub fn backoff_delay(mut self, range: DelayRange) -> Self {
        self.backoff_delay = range;
        self
    }

    /// Set browser headless mode
    ///
    /// Headed mode is only honoured in debug builds; release builds force
    /// headless with a warning.
    #[must_use]
    pub fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    #[must_use]
    pub fn chrome_data_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.chrome_data_dir = dir;
        self
    }

    #[must_use]
    pub fn user_agent(mut self, user_agent: Option<String>) -> Self {
        self.user_agent = user_agent;
        self
    }

    /// Seed the dedup ledger from an existing output table
    ///
    /// Rows already on disk are keyed and counted toward the target, so a
    /// resumed run tops the table up instead of appending duplicates.
    #[must_use]
    pub fn seed_from_output(mut self, seed: bool) -> Self {
        self.seed_from_output = seed;
        self
    }

    #[must_use]
    pub fn stop_on_stall(mut self, stop: bool) -> Self {
        self.stop_on_stall = stop;
        self
    }

    #[must_use]
    pub fn extraction_rules(mut self, rules: ExtractionRules) -> Self {
        self.extraction_rules = rules;
        self
    }
}
