//! Core configuration type for listing sweeps
//!
//! `SweepConfig` carries every operator-facing knob: where to sweep, how far,
//! how hard to retry, how long to wait and where to save.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use url::Url;

use crate::page_fetcher::DelayRange;
use crate::record_extractor::ExtractionRules;

/// Main configuration struct for a sweep run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepConfig {
    /// Search URL with every filter pre-baked; `start` is appended per page.
    pub(crate) base_url: Url,

    /// Output table, opened in append mode.
    pub(crate) output_path: PathBuf,

    /// Unique records to collect before stopping.
    pub(crate) target: usize,

    /// Listings per page, the stride of the `start` offset.
    pub(crate) page_size: u32,

    /// Page window covered by one sweep: indices `0..max_pages`.
    pub(crate) max_pages: u32,

    /// Total sweeps allowed, the first one included.
    ///
    /// **INVARIANT:** at least 1. Bounds the run to
    /// `max_sweeps * max_pages * max_retries` fetch attempts.
    pub(crate) max_sweeps: u32,

    /// Attempts per page before the page is skipped.
    pub(crate) max_retries: u32,

    /// Timeout in seconds for `page.goto()`
    ///
    /// Default: 30 seconds
    pub(crate) page_load_timeout_secs: u64,

    /// Timeout in seconds for the marker selector to appear after navigation
    ///
    /// Default: 10 seconds
    pub(crate) marker_timeout_secs: u64,

    /// Selector whose presence means the listing grid has rendered.
    /// Falls back to the row selector of `extraction_rules`.
    pub(crate) marker_selector: Option<String>,

    /// Randomized pause after a successful render.
    pub(crate) settle_delay: DelayRange,

    /// Randomized pause after a failed attempt.
    pub(crate) backoff_delay: DelayRange,

    pub(crate) headless: bool,

    /// Chrome user data directory for profile isolation.
    /// A per-process temp directory is used when unset.
    pub(crate) chrome_data_dir: Option<PathBuf>,

    /// User agent override; the browser default applies when unset.
    pub(crate) user_agent: Option<String>,

    /// Seed the dedup ledger from rows already present in the output table.
    pub(crate) seed_from_output: bool,

    /// End the run early when a full sweep accepts no new record.
    pub(crate) stop_on_stall: bool,

    pub(crate) extraction_rules: ExtractionRules,
}
