//! Operator-triggered abort
//!
//! The orchestrator checks the signal before dispatching each page. A fetch
//! already in flight is left to finish or time out; nothing is killed
//! mid-navigation.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared stop flag; all clones observe the same signal
#[derive(Debug, Clone, Default)]
pub struct ShutdownSignal {
    flag: Arc<AtomicBool>,
}

impl ShutdownSignal {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request the run to stop. Idempotent.
    pub fn trigger(&self) {
        if !self.flag.swap(true, Ordering::SeqCst) {
            tracing::info!("Shutdown requested; finishing the in-flight page");
        }
    }

    #[must_use]
    pub fn is_triggered(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Trigger on Ctrl-C
    ///
    /// Spawns a task that lives until the signal fires or the runtime ends.
    pub fn trigger_on_ctrl_c(&self) {
        let signal = self.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => signal.trigger(),
                Err(e) => tracing::warn!("Failed to listen for Ctrl-C: {e}"),
            }
        });
    }
}
