//! Chromium-backed page source
//!
//! One browser process and one tab live for the whole run. The tab is
//! replaced after a failed attempt so a wedged renderer never poisons the
//! next page; the browser itself is only closed in `shutdown()`.

use anyhow::{Context, Result};
use chromiumoxide::browser::Browser;
use chromiumoxide::page::Page;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

use super::page_timeout::with_page_timeout;
use super::types::{FetchFailure, PageSource};
use crate::browser_setup::launch_browser;
use crate::config::SweepConfig;
use crate::utils::MARKER_POLL_INTERVAL;

/// Wrapper for Browser and its event handler task
///
/// Ensures the handler is aborted when the browser is dropped. The handler
/// MUST be aborted or it keeps running after the browser is closed.
pub struct BrowserWrapper {
    browser: Browser,
    handler: JoinHandle<()>,
    /// Set only when the profile directory is ours to delete
    temp_data_dir: Option<PathBuf>,
}

impl BrowserWrapper {
    pub(crate) fn new(browser: Browser, handler: JoinHandle<()>, temp_data_dir: Option<PathBuf>) -> Self {
        Self {
            browser,
            handler,
            temp_data_dir,
        }
    }

    pub(crate) fn browser(&self) -> &Browser {
        &self.browser
    }

    pub(crate) fn browser_mut(&mut self) -> &mut Browser {
        &mut self.browser
    }

    /// Remove the temp profile directory
    ///
    /// MUST be called AFTER `browser.wait()` completes so Chrome has released
    /// its file handles.
    pub fn cleanup_temp_dir(&mut self) {
        if let Some(path) = self.temp_data_dir.take() {
            debug!("Cleaning up temp directory: {}", path.display());
            if let Err(e) = std::fs::remove_dir_all(&path) {
                warn!(
                    "Failed to clean up temp directory {}: {}. Manual cleanup may be required.",
                    path.display(),
                    e
                );
            }
        }
    }
}

impl Drop for BrowserWrapper {
    fn drop(&mut self) {
        self.handler.abort();
        if self.temp_data_dir.is_some() {
            warn!("BrowserWrapper dropped without explicit shutdown - removing temp dir in Drop");
            self.cleanup_temp_dir();
        }
    }
}

/// Deadlines and marker for one render attempt
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub page_load_timeout: Duration,
    pub marker_selector: String,
    pub marker_timeout: Duration,
}

impl RenderOptions {
    #[must_use]
    pub fn from_config(config: &SweepConfig) -> Self {
        Self {
            page_load_timeout: config.page_load_timeout(),
            marker_selector: config.marker_selector().to_string(),
            marker_timeout: config.marker_timeout(),
        }
    }
}

/// [`PageSource`] driving a headless Chromium tab over CDP
pub struct ChromiumSource {
    wrapper: Option<BrowserWrapper>,
    page: Option<Page>,
    options: RenderOptions,
}

impl ChromiumSource {
    /// Find or download Chromium, launch it and open the working tab
    pub async fn launch(config: &SweepConfig) -> Result<Self> {
        let (browser, handler, data_dir, owns_data_dir) = launch_browser(
            config.headless(),
            config.chrome_data_dir().cloned(),
            config.user_agent(),
        )
        .await
        .context("Failed to launch browser")?;

        let wrapper = BrowserWrapper::new(browser, handler, owns_data_dir.then_some(data_dir));
        let mut source = Self {
            wrapper: Some(wrapper),
            page: None,
            options: RenderOptions::from_config(config),
        };

        source
            .ensure_page()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to open browser tab: {e}"))?;
        info!("Browser session ready");
        Ok(source)
    }

    async fn ensure_page(&mut self) -> Result<Page, FetchFailure> {
        if let Some(page) = &self.page {
            return Ok(page.clone());
        }

        let wrapper = self
            .wrapper
            .as_ref()
            .ok_or_else(|| FetchFailure::Browser("browser session already closed".to_string()))?;

        let page = wrapper
            .browser()
            .new_page("about:blank")
            .await
            .map_err(|e| FetchFailure::Browser(format!("Failed to create page: {e}")))?;

        self.page = Some(page.clone());
        Ok(page)
    }

    /// Close the current tab; the next attempt opens a fresh one
    async fn discard_page(&mut self) {
        if let Some(page) = self.page.take()
            && let Err(e) = page.close().await
        {
            trace!("Failed to close tab after a failed attempt: {e}");
        }
    }

    async fn render(&mut self, url: &str) -> Result<(), FetchFailure> {
        let page = self.ensure_page().await?;

        with_page_timeout(
            async {
                page.goto(url)
                    .await
                    .map(|_| ())
                    .map_err(|e| FetchFailure::Navigation(e.to_string()))
            },
            self.options.page_load_timeout,
            "Page navigation",
        )
        .await?;

        wait_for_marker(&page, &self.options.marker_selector, self.options.marker_timeout).await
    }
}

impl PageSource for ChromiumSource {
    async fn navigate(&mut self, url: &str) -> Result<(), FetchFailure> {
        let result = self.render(url).await;
        if result.is_err() {
            self.discard_page().await;
        }
        result
    }

    async fn capture(&mut self) -> Result<String, FetchFailure> {
        let page = self
            .page
            .clone()
            .ok_or_else(|| FetchFailure::Browser("no page loaded".to_string()))?;

        let result = with_page_timeout(
            async {
                page.content()
                    .await
                    .map_err(|e| FetchFailure::Browser(format!("Failed to read page content: {e}")))
            },
            self.options.page_load_timeout,
            "Content capture",
        )
        .await;

        if result.is_err() {
            self.discard_page().await;
        }
        result
    }

    async fn shutdown(&mut self) -> Result<()> {
        self.discard_page().await;

        if let Some(mut wrapper) = self.wrapper.take() {
            info!("Shutting down browser session");

            if let Err(e) = wrapper.browser_mut().close().await {
                warn!("Failed to close browser cleanly: {e}");
            }
            // Wait for the process to exit before touching its profile dir
            if let Err(e) = wrapper.browser_mut().wait().await {
                warn!("Failed to wait for browser exit: {e}");
            }
            wrapper.cleanup_temp_dir();
        }

        Ok(())
    }
}

/// Poll the DOM until `selector` matches or `timeout` passes
///
/// Navigation resolves when the document loads, but the listing grid is
/// filled in by script afterwards; the marker proves the grid exists.
async fn wait_for_marker(page: &Page, selector: &str, timeout: Duration) -> Result<(), FetchFailure> {
    let start = Instant::now();

    loop {
        if page.find_element(selector).await.is_ok() {
            debug!("Marker '{}' present after {:?}", selector, start.elapsed());
            return Ok(());
        }

        if start.elapsed() >= timeout {
            let current = page.url().await.ok().flatten().unwrap_or_default();
            trace!("Marker wait expired on {current}");
            return Err(FetchFailure::MarkerMissing {
                selector: selector.to_string(),
                waited_ms: u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
            });
        }

        tokio::time::sleep(MARKER_POLL_INTERVAL).await;
    }
}
