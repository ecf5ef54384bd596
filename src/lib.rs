pub mod browser_setup;
pub mod config;
pub mod dedup_ledger;
pub mod page_fetcher;
pub mod record_extractor;
pub mod record_writer;
pub mod sweep_engine;
pub mod utils;

pub use browser_setup::{download_managed_browser, find_browser_executable, launch_browser};
pub use config::SweepConfig;
pub use dedup_ledger::{DedupLedger, IdentityKey};
pub use page_fetcher::{
    ChromiumSource, DelayProvider, FetchFailure, NoDelay, PageFetcher, PageSource, RandomDelay,
};
pub use record_extractor::{Extraction, ExtractionAnomaly, ExtractionRules, Record, RecordExtractor};
pub use record_writer::{IncrementalWriter, RecordSink, WriterError};
pub use sweep_engine::{
    BarProgress, NoOpProgress, ProgressReporter, ShutdownSignal, SweepError, SweepOrchestrator,
    SweepOutcome, SweepStatus,
};

use tracing::{info, warn};

/// Run a full sweep against a real browser
///
/// Opens the output table, launches the browser and hands both to
/// [`sweep_with`].
pub async fn sweep<P: ProgressReporter>(
    config: SweepConfig,
    progress: P,
    shutdown: ShutdownSignal,
) -> Result<SweepOutcome, SweepError> {
    let mut writer = IncrementalWriter::open(config.output_path())?;
    let source = ChromiumSource::launch(&config).await?;

    let result = sweep_with(config, source, &mut writer, progress, shutdown).await;

    if let Ok(outcome) = &result {
        info!(
            "Sweep finished: {} unique skins saved to {} ({} this run)",
            outcome.unique_count,
            writer.path().display(),
            outcome.records_saved()
        );
    }
    result
}

/// Run a full sweep over any page source and sink
///
/// Builds the extractor, optionally seeds the ledger from the output table
/// and runs the orchestrator. `source` is shut down before this returns on
/// every path, setup errors included.
pub async fn sweep_with<S, W, P>(
    config: SweepConfig,
    source: S,
    sink: &mut W,
    progress: P,
    shutdown: ShutdownSignal,
) -> Result<SweepOutcome, SweepError>
where
    S: PageSource,
    W: RecordSink,
    P: ProgressReporter,
{
    let mut fetcher = PageFetcher::new(
        source,
        RandomDelay::from_config(&config),
        config.max_retries(),
    );

    let result = run_pipeline(config, &mut fetcher, sink, progress, shutdown).await;

    if let Err(e) = fetcher.shutdown().await {
        warn!("Failed to shut down browser cleanly: {e:#}");
    }
    result
}

async fn run_pipeline<S, W, P>(
    config: SweepConfig,
    fetcher: &mut PageFetcher<S, RandomDelay>,
    sink: &mut W,
    progress: P,
    shutdown: ShutdownSignal,
) -> Result<SweepOutcome, SweepError>
where
    S: PageSource,
    W: RecordSink,
    P: ProgressReporter,
{
    let extractor = RecordExtractor::new(config.extraction_rules())?;

    let ledger = DedupLedger::new();
    if config.seed_from_output() {
        ledger.seed_from_csv(config.output_path())?;
    }

    let mut orchestrator = SweepOrchestrator::new(config, extractor, progress, shutdown);
    orchestrator.run(fetcher, &ledger, sink).await
}
