//! Command-line interface for the market sweep binary

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use kodegen_tools_marketscrape::config::SweepConfig;
use kodegen_tools_marketscrape::page_fetcher::DelayRange;
use kodegen_tools_marketscrape::record_extractor::ExtractionRules;
use kodegen_tools_marketscrape::utils::{
    DEFAULT_BASE_URL, DEFAULT_MARKER_TIMEOUT_SECS, DEFAULT_MAX_PAGES, DEFAULT_MAX_RETRIES,
    DEFAULT_MAX_SWEEPS, DEFAULT_OUTPUT_PATH, DEFAULT_PAGE_LOAD_TIMEOUT_SECS, DEFAULT_PAGE_SIZE,
    DEFAULT_TARGET, NAME_SELECTOR, PRICE_SELECTOR, ROW_SELECTOR,
};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Sweep paginated market listings into a deduplicated CSV table",
    long_about = None
)]
pub struct Cli {
    /// Listing URL with search filters already applied
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Output CSV file
    #[arg(short, long, default_value = DEFAULT_OUTPUT_PATH)]
    pub output: PathBuf,

    /// Number of unique records to collect
    #[arg(short, long, default_value_t = DEFAULT_TARGET)]
    pub target: usize,

    /// Listings per page; pages are addressed by start = index * page size
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: u32,

    /// Pages per sweep
    #[arg(long, default_value_t = DEFAULT_MAX_PAGES)]
    pub max_pages: u32,

    /// Total sweeps, the first one included
    #[arg(long, default_value_t = DEFAULT_MAX_SWEEPS)]
    pub max_sweeps: u32,

    /// Load attempts per page
    #[arg(long, default_value_t = DEFAULT_MAX_RETRIES)]
    pub max_retries: u32,

    /// Seconds to wait for a navigation
    #[arg(long, default_value_t = DEFAULT_PAGE_LOAD_TIMEOUT_SECS)]
    pub page_load_timeout: u64,

    /// Seconds to wait for the listing grid to appear
    #[arg(long, default_value_t = DEFAULT_MARKER_TIMEOUT_SECS)]
    pub marker_timeout: u64,

    /// Pause after each load, as MIN-MAX seconds
    #[arg(long, value_parser = parse_delay_range)]
    pub settle_delay: Option<DelayRange>,

    /// Pause before retrying a failed load, as MIN-MAX seconds
    #[arg(long, value_parser = parse_delay_range)]
    pub backoff_delay: Option<DelayRange>,

    /// Skip all politeness pauses
    #[arg(long)]
    pub no_delays: bool,

    /// Show the browser window (debug builds only)
    #[arg(long)]
    pub headed: bool,

    /// Chrome profile directory; a temporary one is used when unset
    #[arg(long)]
    pub chrome_data_dir: Option<PathBuf>,

    /// User agent override; the browser default is used when unset
    #[arg(long)]
    pub user_agent: Option<String>,

    /// Seed deduplication from rows already in the output file
    #[arg(long)]
    pub resume: bool,

    /// Keep restarting even when a whole sweep finds nothing new
    #[arg(long)]
    pub keep_sweeping: bool,

    /// Selector matching one listing row
    #[arg(long, default_value = ROW_SELECTOR)]
    pub row_selector: String,

    /// Selector for the listing name inside a row
    #[arg(long, default_value = NAME_SELECTOR)]
    pub name_selector: String,

    /// Selector for the price inside a row
    #[arg(long, default_value = PRICE_SELECTOR)]
    pub price_selector: String,

    /// Hide the progress bar
    #[arg(short, long)]
    pub quiet: bool,

    /// Print the final outcome as JSON on stdout
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    pub fn into_config(self) -> Result<SweepConfig> {
        let rules = ExtractionRules {
            row: self.row_selector,
            name: self.name_selector,
            price: self.price_selector,
            ..ExtractionRules::default()
        };

        let mut builder = SweepConfig::builder()
            .base_url(self.base_url)
            .output_path(self.output)
            .target(self.target)
            .page_size(self.page_size)
            .max_pages(self.max_pages)
            .max_sweeps(self.max_sweeps)
            .max_retries(self.max_retries)
            .page_load_timeout_secs(self.page_load_timeout)
            .marker_timeout_secs(self.marker_timeout)
            .headless(!self.headed)
            .chrome_data_dir(self.chrome_data_dir)
            .user_agent(self.user_agent)
            .seed_from_output(self.resume)
            .stop_on_stall(!self.keep_sweeping)
            .extraction_rules(rules);

        if let Some(range) = self.settle_delay {
            builder = builder.settle_delay(range);
        }
        if let Some(range) = self.backoff_delay {
            builder = builder.backoff_delay(range);
        }
        if self.no_delays {
            builder = builder.without_delays();
        }

        builder.build()
    }
}

/// Parse `MIN-MAX` (or a single value) in seconds
fn parse_delay_range(raw: &str) -> Result<DelayRange, String> {
    let secs = |s: &str| -> Result<Duration, String> {
        let value: f64 = s
            .trim()
            .parse()
            .map_err(|_| format!("'{s}' is not a number of seconds"))?;
        Duration::try_from_secs_f64(value).map_err(|e| format!("'{s}': {e}"))
    };

    match raw.split_once('-') {
        Some((min, max)) => Ok(DelayRange::new(secs(min)?, secs(max)?)),
        None => Ok(DelayRange::fixed(secs(raw)?)),
    }
}
