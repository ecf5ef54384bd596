//! Fetch failure taxonomy and the page source capability

use std::future::Future;
use thiserror::Error;

/// Why a page could not be fetched
///
/// Every variant is recoverable from the sweep's point of view: the page is
/// retried and, once attempts run out, counted as empty.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchFailure {
    /// A browser operation exceeded its deadline
    #[error("{operation} timeout after {secs} seconds")]
    Timeout { operation: String, secs: u64 },

    /// The browser refused or aborted the navigation
    #[error("Navigation failed: {0}")]
    Navigation(String),

    /// The page loaded but the listing marker never rendered
    #[error("Marker '{selector}' not present after {waited_ms}ms")]
    MarkerMissing { selector: String, waited_ms: u64 },

    /// CDP or tab-level failure (crashed tab, closed target, content read)
    #[error("Browser error: {0}")]
    Browser(String),

    /// All attempts for one URL failed
    #[error("Failed to fetch {url} after {attempts} attempts: {last}")]
    RetriesExhausted {
        url: String,
        attempts: u32,
        last: Box<FetchFailure>,
    },
}

impl FetchFailure {
    /// Whether the deadline, rather than the browser, ended the attempt
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::MarkerMissing { .. } => true,
            Self::RetriesExhausted { last, .. } => last.is_timeout(),
            Self::Navigation(_) | Self::Browser(_) => false,
        }
    }
}

/// A capability that renders one page at a time
///
/// One implementation drives a real browser tab; tests script the outcomes
/// from recorded markup. Implementations keep their session alive between
/// calls and release it in [`shutdown`](PageSource::shutdown).
pub trait PageSource: Send {
    /// Navigate to `url` and block until the listing marker is present
    fn navigate(&mut self, url: &str) -> impl Future<Output = Result<(), FetchFailure>> + Send;

    /// Return the full rendered markup of the current page
    fn capture(&mut self) -> impl Future<Output = Result<String, FetchFailure>> + Send;

    /// Release the browsing session. Safe to call more than once.
    fn shutdown(&mut self) -> impl Future<Output = anyhow::Result<()>> + Send;
}
