//! Timeout utilities for page operations
//!
//! Provides an async timeout wrapper to prevent indefinite hangs during
//! page navigation and content capture.

use std::future::Future;
use std::time::Duration;

use super::types::FetchFailure;

/// Wrap an async page operation with an explicit deadline
///
/// Returns the operation's own failure when it fails in time and
/// [`FetchFailure::Timeout`] when the deadline passes first.
pub async fn with_page_timeout<F, T>(
    operation: F,
    timeout: Duration,
    operation_name: &str,
) -> Result<T, FetchFailure>
where
    F: Future<Output = Result<T, FetchFailure>>,
{
    match tokio::time::timeout(timeout, operation).await {
        Ok(result) => result,
        Err(_) => Err(FetchFailure::Timeout {
            operation: operation_name.to_string(),
            secs: timeout.as_secs(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn slow_operation_becomes_timeout() {
        let result: Result<(), _> = with_page_timeout(
            async {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(())
            },
            Duration::from_secs(10),
            "Page navigation",
        )
        .await;

        assert_eq!(
            result,
            Err(FetchFailure::Timeout {
                operation: "Page navigation".to_string(),
                secs: 10
            })
        );
    }

    #[tokio::test]
    async fn inner_failure_is_preserved() {
        let result: Result<(), _> = with_page_timeout(
            async { Err(FetchFailure::Navigation("net::ERR_NAME_NOT_RESOLVED".into())) },
            Duration::from_secs(10),
            "Page navigation",
        )
        .await;

        assert!(matches!(result, Err(FetchFailure::Navigation(_))));
    }
}
