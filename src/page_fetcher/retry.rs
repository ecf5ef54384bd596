//! Retry wrapper turning a flaky page source into a bounded fetch

use std::time::Duration;
use tracing::{debug, error, info, warn};

use super::delay::{DelayKind, DelayProvider, RandomDelay};
use super::types::{FetchFailure, PageSource};

/// Fetches rendered markup with bounded retries
///
/// Each attempt navigates, waits for the marker, pauses a settle delay and
/// captures the markup. A failed attempt is logged and followed by a backoff
/// delay before the next one; no backoff follows the final attempt. Errors
/// never escape as anything but a [`FetchFailure`].
pub struct PageFetcher<S, D = RandomDelay> {
    source: S,
    delays: D,
    max_retries: u32,
    attempts: u64,
}

impl<S: PageSource, D: DelayProvider> PageFetcher<S, D> {
    /// `max_retries` is the number of attempts per URL; 0 is treated as 1
    pub fn new(source: S, delays: D, max_retries: u32) -> Self {
        Self {
            source,
            delays,
            max_retries: max_retries.max(1),
            attempts: 0,
        }
    }

    /// Fetch the rendered markup of `url`
    pub async fn fetch(&mut self, url: &str) -> Result<String, FetchFailure> {
        let mut last = FetchFailure::Browser("no attempt made".to_string());

        for attempt in 1..=self.max_retries {
            self.attempts += 1;

            match self.attempt(url).await {
                Ok(markup) => {
                    debug!(
                        "Fetched {} ({} bytes) on attempt {}/{}",
                        url,
                        markup.len(),
                        attempt,
                        self.max_retries
                    );
                    return Ok(markup);
                }
                Err(e) => {
                    warn!(
                        "Error fetching {} (attempt {}/{}): {}",
                        url, attempt, self.max_retries, e
                    );
                    if attempt < self.max_retries {
                        let backoff = self.delays.delay(DelayKind::Backoff);
                        info!("Retrying {} in {:.1}s", url, backoff.as_secs_f64());
                        pause(backoff).await;
                    }
                    last = e;
                }
            }
        }

        error!("Failed to fetch {} after {} attempts", url, self.max_retries);
        Err(FetchFailure::RetriesExhausted {
            url: url.to_string(),
            attempts: self.max_retries,
            last: Box::new(last),
        })
    }

    async fn attempt(&mut self, url: &str) -> Result<String, FetchFailure> {
        self.source.navigate(url).await?;
        pause(self.delays.delay(DelayKind::Settle)).await;
        self.source.capture().await
    }

    /// Total attempts made through this fetcher
    #[must_use]
    pub fn attempts(&self) -> u64 {
        self.attempts
    }

    #[must_use]
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Release the underlying browsing session
    pub async fn shutdown(&mut self) -> anyhow::Result<()> {
        self.source.shutdown().await
    }

    /// Take the source back, e.g. to inspect a scripted one in tests
    pub fn into_source(self) -> S {
        self.source
    }
}

async fn pause(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}
