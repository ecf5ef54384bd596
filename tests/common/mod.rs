//! Test utilities and helper functions for the marketscrape test suite

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use kodegen_tools_marketscrape::config::{Complete, SweepConfig, SweepConfigBuilder};
use kodegen_tools_marketscrape::page_fetcher::{FetchFailure, PageSource};
use kodegen_tools_marketscrape::record_extractor::Record;
use kodegen_tools_marketscrape::record_writer::{RecordSink, WriterError};
use url::Url;

/// Renders one listing row the way the market grid does
#[allow(dead_code)]
pub fn listing_row(name: &str, price: Option<&str>, link: &str) -> String {
    let price = price
        .map(|p| {
            format!(
                r#"<span class="normal_price"><span class="sale_price">{p}</span></span>"#
            )
        })
        .unwrap_or_default();
    format!(
        r#"<a class="market_listing_row_link" href="{link}">
    <div class="market_listing_row">
        <span class="market_listing_item_name">{name}</span>
        {price}
    </div>
</a>"#
    )
}

/// Wraps rows in a minimal results page
#[allow(dead_code)]
pub fn listing_page(rows: &[String]) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head><title>Steam Community Market :: Search</title></head>
<body>
    <div id="searchResultsRows">
        {}
    </div>
</body>
</html>"#,
        rows.join("\n        ")
    )
}

/// Page whose rows are `(name, price, link)` triples, all priced
#[allow(dead_code)]
pub fn page_of(items: &[(&str, &str, &str)]) -> String {
    let rows: Vec<String> = items
        .iter()
        .map(|(name, price, link)| listing_row(name, Some(price), link))
        .collect();
    listing_page(&rows)
}

/// Distinct priced rows `first..first + count`
#[allow(dead_code)]
pub fn numbered_page(first: usize, count: usize) -> String {
    let rows: Vec<String> = (first..first + count)
        .map(|n| {
            listing_row(
                &format!("Skin {n}"),
                Some("$0.03"),
                &format!("https://steamcommunity.com/market/listings/730/skin-{n}"),
            )
        })
        .collect();
    listing_page(&rows)
}

#[allow(dead_code)]
pub fn record(name: &str, price: &str, link: &str) -> Record {
    Record::new(name, Some(price.to_string()), link)
}

/// Builder preset for tests: local base URL, no delays, small sweep
#[allow(dead_code)]
pub fn test_config(output: &Path) -> SweepConfigBuilder<Complete> {
    SweepConfig::builder()
        .base_url("https://market.test/search?appid=730")
        .output_path(output)
        .without_delays()
        .page_size(10)
        .max_pages(3)
        .max_sweeps(2)
        .max_retries(3)
        .target(1000)
}

/// What the scripted source does for one page offset
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub enum PageScript {
    Markup(String),
    /// Fail the first `n` navigations, then serve the markup
    FailTimes(u32, String),
    AlwaysFail,
}

/// Page source serving canned markup keyed by `start` offset
///
/// Offsets without a script serve an empty results page.
#[allow(dead_code)]
#[derive(Debug, Default)]
pub struct ScriptedSource {
    scripts: HashMap<u64, PageScript>,
    failures: HashMap<u64, u32>,
    current: Option<String>,
    pub navigations: Vec<String>,
    shutdowns: Arc<AtomicU32>,
}

#[allow(dead_code)]
impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the page at `start = offset`
    pub fn page(mut self, offset: u64, script: PageScript) -> Self {
        self.scripts.insert(offset, script);
        self
    }

    pub fn markup(self, offset: u64, markup: String) -> Self {
        self.page(offset, PageScript::Markup(markup))
    }

    /// Shutdown calls so far
    pub fn shutdowns(&self) -> u32 {
        self.shutdowns.load(Ordering::SeqCst)
    }

    /// Handle that keeps counting after the source is moved away
    pub fn shutdown_counter(&self) -> Arc<AtomicU32> {
        Arc::clone(&self.shutdowns)
    }

    /// Navigations that targeted `start = offset`
    pub fn visits(&self, offset: u64) -> usize {
        self.navigations
            .iter()
            .filter(|url| start_offset(url) == offset)
            .count()
    }
}

fn start_offset(url: &str) -> u64 {
    Url::parse(url)
        .ok()
        .and_then(|u| {
            u.query_pairs()
                .find(|(k, _)| k == "start")
                .and_then(|(_, v)| v.parse().ok())
        })
        .unwrap_or(0)
}

impl PageSource for ScriptedSource {
    async fn navigate(&mut self, url: &str) -> Result<(), FetchFailure> {
        self.navigations.push(url.to_string());
        self.current = None;

        let offset = start_offset(url);
        let markup = match self.scripts.get(&offset) {
            None => listing_page(&[]),
            Some(PageScript::Markup(markup)) => markup.clone(),
            Some(PageScript::AlwaysFail) => {
                return Err(FetchFailure::Timeout {
                    operation: format!("navigate to {url}"),
                    secs: 30,
                });
            }
            Some(PageScript::FailTimes(n, markup)) => {
                let failed = self.failures.entry(offset).or_insert(0);
                if *failed < *n {
                    *failed += 1;
                    return Err(FetchFailure::Navigation(format!(
                        "net::ERR_CONNECTION_RESET at {url}"
                    )));
                }
                markup.clone()
            }
        };

        self.current = Some(markup);
        Ok(())
    }

    async fn capture(&mut self) -> Result<String, FetchFailure> {
        self.current
            .take()
            .ok_or_else(|| FetchFailure::Browser("capture without navigation".to_string()))
    }

    async fn shutdown(&mut self) -> anyhow::Result<()> {
        self.shutdowns.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Sink remembering every append call
#[allow(dead_code)]
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub calls: Vec<Vec<Record>>,
    pub fail: bool,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            calls: Vec::new(),
            fail: true,
        }
    }

    pub fn rows(&self) -> Vec<Record> {
        self.calls.iter().flatten().cloned().collect()
    }
}

impl RecordSink for RecordingSink {
    fn append(&mut self, records: &[Record]) -> Result<(), WriterError> {
        if self.fail {
            return Err(WriterError::Io(std::io::Error::other("disk full")));
        }
        self.calls.push(records.to_vec());
        Ok(())
    }
}
