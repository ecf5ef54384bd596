//! Sweep Engine Module
//!
//! Drives the page sweep: fetch → extract → claim → append per page, with a
//! running unique count checked against the target and a bounded number of
//! restarts from page 0.

// Sub-modules
pub mod orchestrator;
pub mod progress;
pub mod shutdown;
pub mod sweep_types;

// Re-exports for public API
pub use orchestrator::SweepOrchestrator;
pub use progress::{BarProgress, NoOpProgress, ProgressReporter};
pub use shutdown::ShutdownSignal;
pub use sweep_types::{CrawlState, SweepError, SweepOutcome, SweepResult, SweepState, SweepStatus};
