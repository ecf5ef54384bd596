//! Tests for the type-safe configuration builder pattern

use std::path::PathBuf;
use std::time::Duration;

use kodegen_tools_marketscrape::config::SweepConfig;
use kodegen_tools_marketscrape::page_fetcher::DelayRange;
use kodegen_tools_marketscrape::record_extractor::ExtractionRules;
use tempfile::TempDir;

mod common;

#[test]
fn test_builder_requires_base_url_and_output_path() {
    // This should not compile if uncommented - testing compile-time guarantees
    // let config = SweepConfig::builder().build();

    // This should also not compile - missing output_path
    // let config = SweepConfig::builder()
    //     .base_url("https://steamcommunity.com/market/search")
    //     .build();

    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("skins.csv");
    let config = SweepConfig::builder()
        .base_url("https://steamcommunity.com/market/search?appid=730")
        .output_path(output.clone())
        .build()
        .unwrap();

    assert_eq!(config.output_path(), output.as_path());
    assert_eq!(
        config.base_url().as_str(),
        "https://steamcommunity.com/market/search?appid=730"
    );
}

#[test]
fn test_builder_optional_fields_have_defaults() {
    let config = SweepConfig::builder()
        .base_url("https://steamcommunity.com/market/search")
        .output_path("all_skins.csv")
        .build()
        .unwrap();

    assert_eq!(config.target(), 1141);
    assert_eq!(config.page_size(), 10);
    assert_eq!(config.max_pages(), 115);
    assert_eq!(config.max_sweeps(), 2);
    assert_eq!(config.max_retries(), 3);
    assert_eq!(config.page_load_timeout(), Duration::from_secs(30));
    assert_eq!(config.marker_timeout(), Duration::from_secs(10));
    assert_eq!(
        config.settle_delay(),
        DelayRange::new(Duration::from_secs(3), Duration::from_secs(6))
    );
    assert_eq!(
        config.backoff_delay(),
        DelayRange::new(Duration::from_secs(6), Duration::from_secs(10))
    );
    assert!(config.headless());
    assert!(config.stop_on_stall());
    assert!(!config.seed_from_output());
    assert_eq!(config.user_agent(), None);
    assert_eq!(config.chrome_data_dir(), None);
    assert_eq!(config.marker_selector(), "a.market_listing_row_link");
    assert_eq!(config.max_fetch_attempts(), 2 * 115 * 3);
}

#[test]
fn test_builder_normalizes_scheme() {
    let config = SweepConfig::builder()
        .base_url("steamcommunity.com/market/search")
        .output_path("out.csv")
        .build()
        .unwrap();
    assert_eq!(config.base_url().scheme(), "https");
}

#[test]
fn test_builder_only_prefixes_bare_hosts() {
    let plain = SweepConfig::builder()
        .base_url("http://market.test/search")
        .output_path("out.csv")
        .build()
        .unwrap();
    assert_eq!(plain.base_url().scheme(), "http");
    assert_eq!(plain.base_url().host_str(), Some("market.test"));

    for foreign in ["ftp://market.test/search", "file:///tmp/listings.html"] {
        let result = SweepConfig::builder()
            .base_url(foreign)
            .output_path("out.csv")
            .build();
        assert!(result.is_err(), "{foreign} should be rejected");
    }
}

#[test]
fn test_builder_with_all_optional_fields() {
    let rules = ExtractionRules {
        row: "div.row".to_string(),
        ..ExtractionRules::default()
    };
    let config = SweepConfig::builder()
        .base_url("https://market.test/search")
        .output_path("out.csv")
        .target(50)
        .page_size(100)
        .max_pages(5)
        .max_sweeps(1)
        .max_retries(7)
        .page_load_timeout_secs(60)
        .marker_timeout_secs(20)
        .marker_selector("#searchResultsRows")
        .settle_delay(DelayRange::fixed(Duration::from_secs(1)))
        .backoff_delay(DelayRange::new(Duration::from_secs(2), Duration::from_secs(4)))
        .chrome_data_dir(Some(PathBuf::from("/tmp/profile")))
        .user_agent(Some("TestAgent/1.0".to_string()))
        .seed_from_output(true)
        .stop_on_stall(false)
        .extraction_rules(rules)
        .build()
        .unwrap();

    assert_eq!(config.target(), 50);
    assert_eq!(config.max_retries(), 7);
    assert_eq!(config.marker_selector(), "#searchResultsRows");
    assert_eq!(config.user_agent(), Some("TestAgent/1.0"));
    assert_eq!(config.chrome_data_dir(), Some(&PathBuf::from("/tmp/profile")));
    assert!(config.seed_from_output());
    assert!(!config.stop_on_stall());
    assert_eq!(config.extraction_rules().row, "div.row");
    assert_eq!(config.max_fetch_attempts(), 35);
}

#[test]
fn test_page_url_replaces_existing_start() {
    let config = SweepConfig::builder()
        .base_url("https://market.test/search?q=&start=40&appid=730")
        .output_path("out.csv")
        .page_size(10)
        .build()
        .unwrap();

    let url = config.page_url(3);
    let starts: Vec<String> = url
        .query_pairs()
        .filter(|(k, _)| k == "start")
        .map(|(_, v)| v.into_owned())
        .collect();
    assert_eq!(starts, ["30"]);
    assert!(url.query_pairs().any(|(k, v)| k == "appid" && v == "730"));
}

#[test]
fn test_builder_rejects_invalid_values() {
    let base = || {
        SweepConfig::builder()
            .base_url("https://market.test/search")
            .output_path("out.csv")
    };

    assert!(base().max_pages(0).build().is_err());
    assert!(base().max_sweeps(0).build().is_err());
    assert!(base().max_retries(0).build().is_err());
    assert!(base().page_size(0).build().is_err());
    assert!(base().marker_timeout_secs(0).build().is_err());
    assert!(base().marker_selector("  ").build().is_err());
    assert!(
        base()
            .settle_delay(DelayRange::new(Duration::from_secs(5), Duration::from_secs(1)))
            .build()
            .is_err()
    );
    assert!(
        base()
            .extraction_rules(ExtractionRules {
                name: String::new(),
                ..ExtractionRules::default()
            })
            .build()
            .is_err()
    );
    assert!(
        SweepConfig::builder()
            .base_url("ftp://market.test/search")
            .output_path("out.csv")
            .build()
            .is_err()
    );
    assert!(
        SweepConfig::builder()
            .base_url("https://market.test/search")
            .output_path("")
            .build()
            .is_err()
    );
}

#[test]
fn test_without_delays_zeroes_both_ranges() {
    let dir = TempDir::new().unwrap();
    let config = common::test_config(&dir.path().join("out.csv")).build().unwrap();
    assert_eq!(config.settle_delay(), DelayRange::fixed(Duration::ZERO));
    assert_eq!(config.backoff_delay(), DelayRange::fixed(Duration::ZERO));
}

#[test]
fn test_config_round_trips_through_json() {
    let dir = TempDir::new().unwrap();
    let config = common::test_config(&dir.path().join("out.csv"))
        .target(12)
        .build()
        .unwrap();

    let json = serde_json::to_string(&config).unwrap();
    let back: SweepConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back.target(), 12);
    assert_eq!(back.base_url(), config.base_url());
    assert_eq!(back.output_path(), config.output_path());
}
