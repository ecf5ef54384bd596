//! Type-safe builder for `SweepConfig` using the typestate pattern
//!
//! This module provides a fluent builder interface with compile-time validation
//! ensuring that the base URL and the output path are set before building.

use anyhow::{Result, anyhow, bail};
use std::marker::PhantomData;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use super::types::SweepConfig;
use crate::page_fetcher::DelayRange;
use crate::record_extractor::ExtractionRules;
use crate::utils::{
    DEFAULT_BACKOFF_DELAY_MAX, DEFAULT_BACKOFF_DELAY_MIN, DEFAULT_MARKER_TIMEOUT_SECS,
    DEFAULT_MAX_PAGES, DEFAULT_MAX_RETRIES, DEFAULT_MAX_SWEEPS, DEFAULT_PAGE_LOAD_TIMEOUT_SECS,
    DEFAULT_PAGE_SIZE, DEFAULT_SETTLE_DELAY_MAX, DEFAULT_SETTLE_DELAY_MIN, DEFAULT_TARGET,
    is_valid_url,
};

// Type states for the builder
pub struct WithBaseUrl;
pub struct Complete;

pub struct SweepConfigBuilder<State = ()> {
    pub(crate) base_url: Option<String>,
    pub(crate) output_path: Option<PathBuf>,
    pub(crate) target: usize,
    pub(crate) page_size: u32,
    pub(crate) max_pages: u32,
    pub(crate) max_sweeps: u32,
    pub(crate) max_retries: u32,
    pub(crate) page_load_timeout_secs: u64,
    pub(crate) marker_timeout_secs: u64,
    pub(crate) marker_selector: Option<String>,
    pub(crate) settle_delay: DelayRange,
    pub(crate) backoff_delay: DelayRange,
    pub(crate) headless: bool,
    pub(crate) chrome_data_dir: Option<PathBuf>,
    pub(crate) user_agent: Option<String>,
    pub(crate) seed_from_output: bool,
    pub(crate) stop_on_stall: bool,
    pub(crate) extraction_rules: ExtractionRules,
    pub(crate) _phantom: PhantomData<State>,
}

impl Default for SweepConfigBuilder<()> {
    fn default() -> Self {
        Self {
            base_url: None,
            output_path: None,
            target: DEFAULT_TARGET,
            page_size: DEFAULT_PAGE_SIZE,
            max_pages: DEFAULT_MAX_PAGES,
            max_sweeps: DEFAULT_MAX_SWEEPS,
            max_retries: DEFAULT_MAX_RETRIES,
            page_load_timeout_secs: DEFAULT_PAGE_LOAD_TIMEOUT_SECS,
            marker_timeout_secs: DEFAULT_MARKER_TIMEOUT_SECS,
            marker_selector: None,
            settle_delay: DelayRange::new(DEFAULT_SETTLE_DELAY_MIN, DEFAULT_SETTLE_DELAY_MAX),
            backoff_delay: DelayRange::new(DEFAULT_BACKOFF_DELAY_MIN, DEFAULT_BACKOFF_DELAY_MAX),
            headless: true,
            chrome_data_dir: None,
            user_agent: None,
            seed_from_output: false,
            stop_on_stall: true,
            extraction_rules: ExtractionRules::default(),
            _phantom: PhantomData,
        }
    }
}

impl SweepConfig {
    /// Create a builder for configuring a `SweepConfig` with a fluent interface
    #[must_use]
    pub fn builder() -> SweepConfigBuilder<()> {
        SweepConfigBuilder::default()
    }
}

impl<State> SweepConfigBuilder<State> {
    /// Move every field into a builder of another state
    fn into_state<Next>(self) -> SweepConfigBuilder<Next> {
        SweepConfigBuilder {
            base_url: self.base_url,
            output_path: self.output_path,
            target: self.target,
            page_size: self.page_size,
            max_pages: self.max_pages,
            max_sweeps: self.max_sweeps,
            max_retries: self.max_retries,
            page_load_timeout_secs: self.page_load_timeout_secs,
            marker_timeout_secs: self.marker_timeout_secs,
            marker_selector: self.marker_selector,
            settle_delay: self.settle_delay,
            backoff_delay: self.backoff_delay,
            headless: self.headless,
            chrome_data_dir: self.chrome_data_dir,
            user_agent: self.user_agent,
            seed_from_output: self.seed_from_output,
            stop_on_stall: self.stop_on_stall,
            extraction_rules: self.extraction_rules,
            _phantom: PhantomData,
        }
    }
}

impl SweepConfigBuilder<()> {
    pub fn base_url(mut self, url: impl Into<String>) -> SweepConfigBuilder<WithBaseUrl> {
        let url_string = url.into();

        // Add https:// only when no scheme is present; any other scheme is
        // left for build() to reject
        let normalized_url = if url_string.contains("://") {
            url_string
        } else {
            format!("https://{url_string}")
        };

        self.base_url = Some(normalized_url);
        self.into_state()
    }
}

impl SweepConfigBuilder<WithBaseUrl> {
    pub fn output_path(mut self, path: impl Into<PathBuf>) -> SweepConfigBuilder<Complete> {
        self.output_path = Some(path.into());
        self.into_state()
    }
}

// Build method only available when all required fields are set
impl SweepConfigBuilder<Complete> {
    pub fn build(self) -> Result<SweepConfig> {
        let raw_url = self
            .base_url
            .ok_or_else(|| anyhow!("base_url is required"))?;
        if !is_valid_url(&raw_url) {
            bail!("base_url must be an http(s) URL, got '{raw_url}'");
        }
        let base_url =
            Url::parse(&raw_url).map_err(|e| anyhow!("Invalid base_url '{raw_url}': {e}"))?;

        let output_path = self
            .output_path
            .ok_or_else(|| anyhow!("output_path is required"))?;
        if output_path.as_os_str().is_empty() {
            bail!("output_path must not be empty");
        }

        if self.page_size == 0 {
            bail!("page_size must be at least 1");
        }
        if self.max_pages == 0 {
            bail!("max_pages must be at least 1");
        }
        if self.max_sweeps == 0 {
            bail!("max_sweeps must be at least 1");
        }
        if self.max_retries == 0 {
            bail!("max_retries must be at least 1");
        }
        if self.marker_timeout_secs == 0 || self.page_load_timeout_secs == 0 {
            bail!("timeouts must be at least 1 second");
        }

        self.settle_delay.validate("settle_delay")?;
        self.backoff_delay.validate("backoff_delay")?;
        self.extraction_rules.validate()?;

        if let Some(marker) = &self.marker_selector
            && marker.trim().is_empty()
        {
            bail!("marker_selector must not be blank");
        }

        // Enforce headless mode in release builds for production safety
        #[cfg(not(debug_assertions))]
        let headless = if !self.headless {
            tracing::warn!(
                "Forcing headless mode in release build. \
                Headed mode is only available in debug builds for development."
            );
            true
        } else {
            self.headless
        };

        #[cfg(debug_assertions)]
        let headless = self.headless;

        Ok(SweepConfig {
            base_url,
            output_path,
            target: self.target,
            page_size: self.page_size,
            max_pages: self.max_pages,
            max_sweeps: self.max_sweeps,
            max_retries: self.max_retries,
            page_load_timeout_secs: self.page_load_timeout_secs,
            marker_timeout_secs: self.marker_timeout_secs,
            marker_selector: self.marker_selector,
            settle_delay: self.settle_delay,
            backoff_delay: self.backoff_delay,
            headless,
            chrome_data_dir: self.chrome_data_dir,
            user_agent: self.user_agent,
            seed_from_output: self.seed_from_output,
            stop_on_stall: self.stop_on_stall,
            extraction_rules: self.extraction_rules,
        })
    }
}

impl<State> SweepConfigBuilder<State> {
    /// Disable every politeness delay
    ///
    /// Only meant for local fixtures and tests; the live market rate-limits
    /// clients that re-request without pausing.
    #[must_use]
    pub fn without_delays(mut self) -> Self {
        self.settle_delay = DelayRange::fixed(Duration::ZERO);
        self.backoff_delay = DelayRange::fixed(Duration::ZERO);
        self
    }
}
