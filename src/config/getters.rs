//! Getter methods for `SweepConfig`
//!
//! This module provides all the accessor methods for retrieving configuration
//! values from a `SweepConfig` instance.

use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use super::types::SweepConfig;
use crate::page_fetcher::DelayRange;
use crate::record_extractor::ExtractionRules;
use crate::utils::page_url;

impl SweepConfig {
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    #[must_use]
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    #[must_use]
    pub fn target(&self) -> usize {
        self.target
    }

    #[must_use]
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    #[must_use]
    pub fn max_pages(&self) -> u32 {
        self.max_pages
    }

    #[must_use]
    pub fn max_sweeps(&self) -> u32 {
        self.max_sweeps
    }

    #[must_use]
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    #[must_use]
    pub fn page_load_timeout(&self) -> Duration {
        Duration::from_secs(self.page_load_timeout_secs)
    }

    #[must_use]
    pub fn marker_timeout(&self) -> Duration {
        Duration::from_secs(self.marker_timeout_secs)
    }

    /// Selector awaited after navigation, defaulting to the row selector
    #[must_use]
    pub fn marker_selector(&self) -> &str {
        self.marker_selector
            .as_deref()
            .unwrap_or(&self.extraction_rules.row)
    }

    #[must_use]
    pub fn settle_delay(&self) -> DelayRange {
        self.settle_delay
    }

    #[must_use]
    pub fn backoff_delay(&self) -> DelayRange {
        self.backoff_delay
    }

    #[must_use]
    pub fn headless(&self) -> bool {
        self.headless
    }

    #[must_use]
    pub fn chrome_data_dir(&self) -> Option<&PathBuf> {
        self.chrome_data_dir.as_ref()
    }

    #[must_use]
    pub fn user_agent(&self) -> Option<&str> {
        self.user_agent.as_deref()
    }

    #[must_use]
    pub fn seed_from_output(&self) -> bool {
        self.seed_from_output
    }

    #[must_use]
    pub fn stop_on_stall(&self) -> bool {
        self.stop_on_stall
    }

    #[must_use]
    pub fn extraction_rules(&self) -> &ExtractionRules {
        &self.extraction_rules
    }

    /// URL of the result page at `page_index`
    #[must_use]
    pub fn page_url(&self, page_index: u32) -> Url {
        page_url(&self.base_url, page_index, self.page_size)
    }

    /// Upper bound on fetch attempts for a whole run
    #[must_use]
    pub fn max_fetch_attempts(&self) -> u64 {
        u64::from(self.max_sweeps) * u64::from(self.max_pages) * u64::from(self.max_retries)
    }
}
