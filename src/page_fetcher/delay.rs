//! Politeness delays
//!
//! Two randomized pauses protect the storefront and the run: a settle pause
//! after the marker renders (late price widgets) and a longer backoff after a
//! failed attempt (rapid retries get rate-limited). Both come from a
//! [`DelayProvider`] so tests run with [`NoDelay`].

use anyhow::{Result, bail};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Which pause is being requested
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelayKind {
    /// After a successful render, before capturing markup
    Settle,
    /// After a failed attempt, before the next one
    Backoff,
}

/// Inclusive range a delay is drawn from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayRange {
    pub min: Duration,
    pub max: Duration,
}

impl DelayRange {
    #[must_use]
    pub const fn new(min: Duration, max: Duration) -> Self {
        Self { min, max }
    }

    #[must_use]
    pub const fn fixed(delay: Duration) -> Self {
        Self {
            min: delay,
            max: delay,
        }
    }

    /// Draw a delay uniformly from `min..=max` at millisecond resolution
    #[must_use]
    pub fn sample(&self) -> Duration {
        if self.max <= self.min {
            return self.min;
        }
        let min_ms = duration_millis(self.min);
        let max_ms = duration_millis(self.max);
        Duration::from_millis(rand::rng().random_range(min_ms..=max_ms))
    }

    pub(crate) fn validate(&self, name: &str) -> Result<()> {
        if self.min > self.max {
            bail!(
                "{name}: min {:?} is greater than max {:?}",
                self.min,
                self.max
            );
        }
        Ok(())
    }
}

fn duration_millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

/// Source of pause lengths for the fetcher
pub trait DelayProvider: Send + Sync {
    fn delay(&self, kind: DelayKind) -> Duration;
}

/// Uniformly random delays within configured ranges
#[derive(Debug, Clone, Copy)]
pub struct RandomDelay {
    settle: DelayRange,
    backoff: DelayRange,
}

impl RandomDelay {
    #[must_use]
    pub const fn new(settle: DelayRange, backoff: DelayRange) -> Self {
        Self { settle, backoff }
    }

    #[must_use]
    pub fn from_config(config: &crate::config::SweepConfig) -> Self {
        Self::new(config.settle_delay(), config.backoff_delay())
    }
}

impl DelayProvider for RandomDelay {
    fn delay(&self, kind: DelayKind) -> Duration {
        match kind {
            DelayKind::Settle => self.settle.sample(),
            DelayKind::Backoff => self.backoff.sample(),
        }
    }
}

/// Delay provider that never pauses
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

impl DelayProvider for NoDelay {
    #[inline(always)]
    fn delay(&self, _kind: DelayKind) -> Duration {
        Duration::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_stay_inside_range() {
        let range = DelayRange::new(Duration::from_secs(3), Duration::from_secs(6));
        for _ in 0..200 {
            let d = range.sample();
            assert!(d >= Duration::from_secs(3) && d <= Duration::from_secs(6), "{d:?}");
        }
    }

    #[test]
    fn fixed_range_always_returns_its_value() {
        let range = DelayRange::fixed(Duration::from_millis(250));
        assert_eq!(range.sample(), Duration::from_millis(250));
    }

    #[test]
    fn inverted_range_fails_validation() {
        let range = DelayRange::new(Duration::from_secs(10), Duration::from_secs(6));
        assert!(range.validate("backoff_delay").is_err());
    }

    #[test]
    fn random_delay_uses_the_range_for_each_kind() {
        let delays = RandomDelay::new(
            DelayRange::fixed(Duration::from_secs(4)),
            DelayRange::fixed(Duration::from_secs(8)),
        );
        assert_eq!(delays.delay(DelayKind::Settle), Duration::from_secs(4));
        assert_eq!(delays.delay(DelayKind::Backoff), Duration::from_secs(8));
        assert_eq!(NoDelay.delay(DelayKind::Backoff), Duration::ZERO);
    }
}
