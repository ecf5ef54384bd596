//! Locating and starting the Chromium process
//!
//! Resolution order: `CHROMIUM_PATH`, well-known install locations, a `which`
//! lookup on Unix, and finally a managed download into the user cache.

use anyhow::{Context, Result};
use chromiumoxide::browser::{Browser, BrowserConfigBuilder, HeadlessMode};
use chromiumoxide::fetcher::{BrowserFetcher, BrowserFetcherOptions};
use futures::StreamExt;
use std::path::PathBuf;
use std::process::Command;
use std::time::Duration;
use tokio::task::{self, JoinHandle};
use tracing::{debug, error, info, trace, warn};

const BINARY_NAMES: [&str; 4] = ["chromium", "chromium-browser", "google-chrome", "chrome"];

/// Install locations checked before falling back to `which`
fn install_locations() -> Vec<PathBuf> {
    let fixed: &[&str] = if cfg!(target_os = "windows") {
        &[
            r"C:\Program Files\Google\Chrome\Application\chrome.exe",
            r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
        ]
    } else if cfg!(target_os = "macos") {
        &[
            "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
            "/Applications/Chromium.app/Contents/MacOS/Chromium",
            "/opt/homebrew/bin/chromium",
        ]
    } else {
        &[
            "/usr/bin/chromium",
            "/usr/bin/chromium-browser",
            "/usr/bin/google-chrome",
            "/usr/bin/google-chrome-stable",
            "/snap/bin/chromium",
        ]
    };

    let mut locations: Vec<PathBuf> = fixed.iter().map(PathBuf::from).collect();
    if cfg!(target_os = "macos")
        && let Some(home) = dirs::home_dir()
    {
        locations.push(home.join("Applications/Chromium.app/Contents/MacOS/Chromium"));
    }
    locations
}

fn which(binary: &str) -> Option<PathBuf> {
    let output = Command::new("which").arg(binary).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let found = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!found.is_empty()).then(|| PathBuf::from(found))
}

/// Locate an installed Chrome or Chromium
pub async fn find_browser_executable() -> Result<PathBuf> {
    if let Ok(raw) = std::env::var("CHROMIUM_PATH") {
        let path = PathBuf::from(raw);
        if path.exists() {
            info!("Using browser from CHROMIUM_PATH: {}", path.display());
            return Ok(path);
        }
        warn!("CHROMIUM_PATH does not exist: {}", path.display());
    }

    if let Some(path) = install_locations().into_iter().find(|p| p.exists()) {
        info!("Found browser at: {}", path.display());
        return Ok(path);
    }

    if !cfg!(target_os = "windows")
        && let Some(path) = BINARY_NAMES.iter().find_map(|name| which(name))
    {
        info!("Found browser on PATH: {}", path.display());
        return Ok(path);
    }

    Err(anyhow::anyhow!("Chrome/Chromium executable not found"))
}

/// Download a managed Chromium into the user cache and return its executable
pub async fn download_managed_browser() -> Result<PathBuf> {
    let cache_dir = dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("kodegen")
        .join("marketscrape")
        .join("chromium");
    std::fs::create_dir_all(&cache_dir).context("Failed to create browser cache directory")?;

    info!("No local browser; downloading Chromium into {}", cache_dir.display());
    let options = BrowserFetcherOptions::builder()
        .with_path(&cache_dir)
        .build()
        .context("Failed to build fetcher options")?;
    let revision = BrowserFetcher::new(options)
        .fetch()
        .await
        .context("Failed to download Chromium")?;

    Ok(revision.executable_path)
}

/// Command-line switches passed to every launch
#[must_use]
pub fn launch_args(user_agent: Option<&str>) -> Vec<String> {
    let mut args: Vec<String> = [
        "--disable-gpu",
        "--no-first-run",
        "--no-default-browser-check",
        "--no-sandbox",
        "--mute-audio",
        "--hide-scrollbars",
    ]
    .into_iter()
    .map(String::from)
    .collect();

    if let Some(agent) = user_agent {
        args.push(format!("--user-agent={agent}"));
    }
    args
}

/// Start Chromium and spawn its CDP event loop
///
/// Returns the browser, the handler task, the profile directory and whether
/// that directory was created here and must be removed after shutdown.
pub async fn launch_browser(
    headless: bool,
    chrome_data_dir: Option<PathBuf>,
    user_agent: Option<&str>,
) -> Result<(Browser, JoinHandle<()>, PathBuf, bool)> {
    let executable = match find_browser_executable().await {
        Ok(path) => path,
        Err(e) => {
            debug!("{e}");
            download_managed_browser().await?
        }
    };

    let owns_data_dir = chrome_data_dir.is_none();
    let data_dir = chrome_data_dir.unwrap_or_else(|| {
        std::env::temp_dir().join(format!("marketscrape_chrome_{}", std::process::id()))
    });
    std::fs::create_dir_all(&data_dir).context("Failed to create browser profile directory")?;

    let mut builder = BrowserConfigBuilder::default()
        .request_timeout(Duration::from_secs(30))
        .window_size(1920, 1080)
        .user_data_dir(data_dir.clone())
        .chrome_executable(executable);
    for arg in launch_args(user_agent) {
        builder = builder.arg(arg);
    }
    let builder = if headless {
        builder.headless_mode(HeadlessMode::default())
    } else {
        builder.with_head()
    };
    let browser_config = builder
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build browser config: {e}"))?;

    info!("Launching browser (headless: {headless})");
    let (browser, mut handler) = Browser::launch(browser_config)
        .await
        .context("Failed to launch browser")?;

    let handler_task = task::spawn(async move {
        while let Some(event) = handler.next().await {
            let Err(e) = event else { continue };
            let message = e.to_string();
            // chromiumoxide has no type for some CDP events
            // https://github.com/mattsse/chromiumoxide/issues/167
            if message.contains("data did not match any variant of untagged enum Message")
                || message.contains("Failed to deserialize WS response")
            {
                trace!("Ignored untyped CDP message: {message}");
            } else {
                error!("Browser handler error: {e:?}");
            }
        }
        debug!("Browser handler task completed");
    });

    Ok((browser, handler_task, data_dir, owns_data_dir))
}
