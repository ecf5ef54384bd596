//! Core types for sweep runs.
//!
//! This module contains the error type, the state machine states and the
//! final report of a sweep.

use serde::Serialize;
use thiserror::Error;

use crate::record_extractor::ExtractorError;
use crate::record_writer::WriterError;

/// Errors that end a run
///
/// Fetch failures and extraction anomalies never show up here: they only
/// shrink a page's contribution. What remains is fatal.
#[derive(Debug, Error)]
pub enum SweepError {
    /// Persisting accepted records failed; continuing would lose data
    #[error("Failed to persist records: {0}")]
    Writer(#[from] WriterError),

    #[error("Extractor setup failed: {0}")]
    Extractor(#[from] ExtractorError),

    /// The browser could not be launched
    #[error("Browser error: {0}")]
    Browser(String),
}

impl From<anyhow::Error> for SweepError {
    fn from(err: anyhow::Error) -> Self {
        // Use {:#} to preserve full error chain with context
        Self::Browser(format!("{err:#}"))
    }
}

/// Convenience alias for Result with `SweepError`
pub type SweepResult<T> = Result<T, SweepError>;

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum SweepStatus {
    /// `unique_count` reached the target
    TargetReached,
    /// Sweeps ran out, or a full sweep accepted nothing, below the target
    Exhausted { no_progress: bool },
    /// The operator stopped the run
    Aborted,
}

/// Orchestrator state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepState {
    /// Processing `page_index` of sweep number `sweep` (1-based)
    Sweeping { sweep: u32, page_index: u32 },
    Done(SweepStatus),
}

/// Counters threaded across pages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrawlState {
    /// Page the sweep dispatches next
    pub next_page_index: u32,
    pub unique_count: usize,
    pub target: usize,
}

impl CrawlState {
    #[must_use]
    pub fn new(target: usize, unique_count: usize) -> Self {
        Self {
            next_page_index: 0,
            unique_count,
            target,
        }
    }

    #[must_use]
    pub fn target_reached(&self) -> bool {
        self.unique_count >= self.target
    }

    #[must_use]
    pub fn shortfall(&self) -> usize {
        self.target.saturating_sub(self.unique_count)
    }
}

/// Final report of a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SweepOutcome {
    #[serde(flatten)]
    pub status: SweepStatus,
    pub unique_count: usize,
    pub target: usize,
    /// `target - unique_count`, 0 when the target was reached
    pub shortfall: usize,
    /// Records that came from seeding rather than this run's pages
    pub seeded: usize,
    pub sweeps_started: u32,
    /// Page the run would have dispatched next
    pub next_page_index: u32,
    pub pages_fetched: u64,
    pub pages_failed: u64,
    pub duplicates_skipped: u64,
    pub anomalies: u64,
    pub fetch_attempts: u64,
}

impl SweepOutcome {
    #[must_use]
    pub fn target_reached(&self) -> bool {
        self.status == SweepStatus::TargetReached
    }

    /// Records appended to the output table by this run
    #[must_use]
    pub fn records_saved(&self) -> usize {
        self.unique_count.saturating_sub(self.seeded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_serializes_flat() {
        let outcome = SweepOutcome {
            status: SweepStatus::Exhausted { no_progress: true },
            unique_count: 900,
            target: 1141,
            shortfall: 241,
            seeded: 0,
            sweeps_started: 2,
            next_page_index: 0,
            pages_fetched: 228,
            pages_failed: 2,
            duplicates_skipped: 1280,
            anomalies: 0,
            fetch_attempts: 236,
        };

        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "exhausted");
        assert_eq!(json["no_progress"], true);
        assert_eq!(json["shortfall"], 241);
        assert!(!outcome.target_reached());
        assert_eq!(outcome.records_saved(), 900);
    }

    #[test]
    fn shortfall_saturates() {
        let state = CrawlState::new(10, 12);
        assert!(state.target_reached());
        assert_eq!(state.shortfall(), 0);
    }
}
