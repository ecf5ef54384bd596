//! Page fetching for JavaScript-rendered listing pages
//!
//! The listing grid only exists after the storefront's scripts run, so pages
//! are loaded in a real browser tab. The module is split along the seam the
//! orchestrator is tested through:
//!
//! - [`PageSource`]: one render attempt (navigate, wait for marker, capture)
//! - [`ChromiumSource`]: the chromiumoxide-backed source owning one tab
//! - [`PageFetcher`]: retries, settle pauses and backoff around a source
//! - [`DelayProvider`]: randomized politeness delays, zero in tests

mod chromium;
mod delay;
mod page_timeout;
mod retry;
mod types;

pub use chromium::{BrowserWrapper, ChromiumSource, RenderOptions};
pub use delay::{DelayKind, DelayProvider, DelayRange, NoDelay, RandomDelay};
pub use page_timeout::with_page_timeout;
pub use retry::PageFetcher;
pub use types::{FetchFailure, PageSource};
