//! Progress reporting for sweep runs

use indicatif::{ProgressBar, ProgressStyle};

use super::sweep_types::SweepOutcome;
use crate::page_fetcher::FetchFailure;

/// Receives sweep milestones as they happen
pub trait ProgressReporter: Send + Sync {
    /// A sweep over pages `0..max_pages` is starting from `unique_count`
    fn report_sweep_started(&self, sweep: u32, max_pages: u32, unique_count: usize);

    /// Page `page_index` is about to be fetched
    fn report_page_started(&self, page_index: u32);

    /// The page could not be loaded within its retry budget
    fn report_page_failed(&self, page_index: u32, failure: &FetchFailure);

    /// The page was processed; `accepted` novel records were saved
    fn report_page_saved(&self, page_index: u32, accepted: usize, unique_count: usize);

    fn report_completed(&self, outcome: &SweepOutcome);
}

/// Progress reporter that does nothing
#[derive(Debug, Clone, Copy)]
pub struct NoOpProgress;

impl ProgressReporter for NoOpProgress {
    #[inline(always)]
    fn report_sweep_started(&self, _sweep: u32, _max_pages: u32, _unique_count: usize) {}

    #[inline(always)]
    fn report_page_started(&self, _page_index: u32) {}

    #[inline(always)]
    fn report_page_failed(&self, _page_index: u32, _failure: &FetchFailure) {}

    #[inline(always)]
    fn report_page_saved(&self, _page_index: u32, _accepted: usize, _unique_count: usize) {}

    #[inline(always)]
    fn report_completed(&self, _outcome: &SweepOutcome) {}
}

/// Terminal progress bar counting unique records toward the target
pub struct BarProgress {
    bar: ProgressBar,
}

impl BarProgress {
    #[must_use]
    pub fn new(target: usize) -> Self {
        let bar = ProgressBar::new(target as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} skins {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        Self { bar }
    }

    /// A bar that draws nothing, for non-interactive runs
    #[must_use]
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }
}

impl ProgressReporter for BarProgress {
    fn report_sweep_started(&self, sweep: u32, max_pages: u32, unique_count: usize) {
        self.bar.set_position(unique_count as u64);
        self.bar
            .set_message(format!("sweep {sweep}, {max_pages} pages"));
    }

    fn report_page_started(&self, page_index: u32) {
        self.bar.set_message(format!("page {}", page_index + 1));
    }

    fn report_page_failed(&self, page_index: u32, _failure: &FetchFailure) {
        self.bar
            .set_message(format!("page {} failed", page_index + 1));
    }

    fn report_page_saved(&self, _page_index: u32, _accepted: usize, unique_count: usize) {
        self.bar.set_position(unique_count as u64);
    }

    fn report_completed(&self, outcome: &SweepOutcome) {
        self.bar.set_position(outcome.unique_count as u64);
        if outcome.target_reached() {
            self.bar.finish_with_message("target reached");
        } else {
            self.bar
                .abandon_with_message(format!("{} short of target", outcome.shortfall));
        }
    }
}
