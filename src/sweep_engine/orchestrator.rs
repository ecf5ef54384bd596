//! Sweep orchestration
//!
//! Runs the page sweep state machine over a [`PageFetcher`]. Pages are
//! processed strictly in index order; each page is fetched, extracted,
//! claimed against the ledger and appended before the next one starts.

use tracing::{debug, info, warn};

use super::progress::ProgressReporter;
use super::shutdown::ShutdownSignal;
use super::sweep_types::{CrawlState, SweepOutcome, SweepResult, SweepState, SweepStatus};
use crate::config::SweepConfig;
use crate::dedup_ledger::DedupLedger;
use crate::page_fetcher::{DelayProvider, PageFetcher, PageSource};
use crate::record_extractor::RecordExtractor;
use crate::record_writer::RecordSink;

#[derive(Debug, Default)]
struct SweepStats {
    sweeps_started: u32,
    pages_fetched: u64,
    pages_failed: u64,
    duplicates_skipped: u64,
    anomalies: u64,
}

/// Drives sweeps until the target is met, sweeps run out or the run is
/// aborted
pub struct SweepOrchestrator<P> {
    config: SweepConfig,
    extractor: RecordExtractor,
    progress: P,
    shutdown: ShutdownSignal,
    state: SweepState,
}

impl<P: ProgressReporter> SweepOrchestrator<P> {
    pub fn new(
        config: SweepConfig,
        extractor: RecordExtractor,
        progress: P,
        shutdown: ShutdownSignal,
    ) -> Self {
        Self {
            config,
            extractor,
            progress,
            shutdown,
            state: SweepState::Sweeping {
                sweep: 1,
                page_index: 0,
            },
        }
    }

    /// Current state; terminal once `run()` has returned `Ok`
    #[must_use]
    pub fn state(&self) -> SweepState {
        self.state
    }

    /// Run the state machine to completion
    ///
    /// The unique count starts from whatever `ledger` already holds, so a
    /// seeded ledger counts toward the target. A sweep counts as stalled only
    /// when every page loaded and none yielded a new record; failed pages
    /// always earn the restart. Only a writer failure ends the run with an
    /// error.
    pub async fn run<S, D, W>(
        &mut self,
        fetcher: &mut PageFetcher<S, D>,
        ledger: &DedupLedger,
        sink: &mut W,
    ) -> SweepResult<SweepOutcome>
    where
        S: PageSource,
        D: DelayProvider,
        W: RecordSink,
    {
        let seeded = ledger.len();
        let attempts_before = fetcher.attempts();
        let max_pages = self.config.max_pages();
        let max_sweeps = self.config.max_sweeps();

        let mut crawl = CrawlState::new(self.config.target(), seeded);
        let mut stats = SweepStats::default();
        let mut accepted_this_sweep = 0usize;
        let mut failed_this_sweep = 0u64;

        self.state = if crawl.target_reached() {
            info!(
                "Already have {} unique skins (target {}); nothing to fetch",
                crawl.unique_count, crawl.target
            );
            SweepState::Done(SweepStatus::TargetReached)
        } else {
            SweepState::Sweeping {
                sweep: 1,
                page_index: 0,
            }
        };

        while let SweepState::Sweeping { sweep, page_index } = self.state {
            crawl.next_page_index = page_index;
            if page_index == 0 {
                stats.sweeps_started = sweep;
                accepted_this_sweep = 0;
                failed_this_sweep = 0;
                info!("Starting sweep {}/{}", sweep, max_sweeps);
                self.progress
                    .report_sweep_started(sweep, max_pages, crawl.unique_count);
            }

            if self.shutdown.is_triggered() {
                warn!("Sweep aborted before page {}", page_index + 1);
                self.state = SweepState::Done(SweepStatus::Aborted);
                break;
            }

            let failed_before = stats.pages_failed;
            accepted_this_sweep += self
                .process_page(page_index, fetcher, ledger, sink, &mut crawl, &mut stats)
                .await?;
            failed_this_sweep += stats.pages_failed - failed_before;
            crawl.next_page_index = page_index + 1;

            self.state = if crawl.target_reached() {
                info!("Reached target of {} unique skins", crawl.target);
                SweepState::Done(SweepStatus::TargetReached)
            } else if page_index + 1 < max_pages {
                SweepState::Sweeping {
                    sweep,
                    page_index: page_index + 1,
                }
            } else if accepted_this_sweep == 0
                && failed_this_sweep == 0
                && self.config.stop_on_stall()
            {
                warn!(
                    "Sweep {} found no new skins; stopping {} short of target",
                    sweep,
                    crawl.shortfall()
                );
                SweepState::Done(SweepStatus::Exhausted { no_progress: true })
            } else if sweep < max_sweeps {
                warn!(
                    "Still need {} unique skins. Retrying the pages...",
                    crawl.shortfall()
                );
                SweepState::Sweeping {
                    sweep: sweep + 1,
                    page_index: 0,
                }
            } else {
                warn!(
                    "All {} sweeps done; {} unique skins short of target",
                    max_sweeps,
                    crawl.shortfall()
                );
                SweepState::Done(SweepStatus::Exhausted { no_progress: false })
            };
        }

        let status = match self.state {
            SweepState::Done(status) => status,
            // The loop only exits on a terminal state
            SweepState::Sweeping { .. } => SweepStatus::Aborted,
        };

        let outcome = SweepOutcome {
            status,
            unique_count: crawl.unique_count,
            target: crawl.target,
            shortfall: crawl.shortfall(),
            seeded,
            sweeps_started: stats.sweeps_started,
            next_page_index: crawl.next_page_index,
            pages_fetched: stats.pages_fetched,
            pages_failed: stats.pages_failed,
            duplicates_skipped: stats.duplicates_skipped,
            anomalies: stats.anomalies,
            fetch_attempts: fetcher.attempts() - attempts_before,
        };

        self.progress.report_completed(&outcome);
        Ok(outcome)
    }

    /// Fetch, extract, claim and persist one page; returns records accepted
    async fn process_page<S, D, W>(
        &self,
        page_index: u32,
        fetcher: &mut PageFetcher<S, D>,
        ledger: &DedupLedger,
        sink: &mut W,
        crawl: &mut CrawlState,
        stats: &mut SweepStats,
    ) -> SweepResult<usize>
    where
        S: PageSource,
        D: DelayProvider,
        W: RecordSink,
    {
        let url = self.config.page_url(page_index);
        let offset = u64::from(page_index) * u64::from(self.config.page_size());
        info!("Scraping page {} (start={})...", page_index + 1, offset);
        self.progress.report_page_started(page_index);

        let markup = match fetcher.fetch(url.as_str()).await {
            Ok(markup) => markup,
            Err(failure) => {
                warn!("Failed to load page starting at {}. Skipping...", offset);
                stats.pages_failed += 1;
                self.progress.report_page_failed(page_index, &failure);
                return Ok(0);
            }
        };
        stats.pages_fetched += 1;

        let extraction = self.extractor.extract(&markup);
        stats.anomalies += extraction.anomalies.len() as u64;

        let mut accepted = Vec::new();
        for record in extraction.records {
            if !ledger.claim(&record) {
                debug!("Skipping duplicate: {}", record.name);
                stats.duplicates_skipped += 1;
                continue;
            }

            info!("Scraped skin: {} | Price: {}", record.name, record.price);
            accepted.push(record);
            crawl.unique_count += 1;

            if crawl.target_reached() {
                break;
            }
        }

        if !accepted.is_empty() {
            sink.append(&accepted)?;
        }

        self.progress
            .report_page_saved(page_index, accepted.len(), crawl.unique_count);
        Ok(accepted.len())
    }
}
