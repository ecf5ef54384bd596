//! Shared configuration constants for marketscrape
//!
//! Default values used by the config builder, the CLI and the extractor so the
//! three never drift apart.

use std::time::Duration;

/// Steam Community Market search for common-grade CS2 weapon skins.
///
/// Every category filter is pinned to `any` except rarity so the result set is
/// the fixed ~1141 listings the default target is sized for.
pub const DEFAULT_BASE_URL: &str = "https://steamcommunity.com/market/search?q=&category_730_ItemSet%5B0%5D=any&category_730_ProPlayer%5B0%5D=any&category_730_StickerCapsule%5B0%5D=any&category_730_Tournament%5B0%5D=any&category_730_TournamentTeam%5B0%5D=any&category_730_Type%5B0%5D=any&category_730_Weapon%5B0%5D=any&category_730_Rarity%5B0%5D=tag_Rarity_Common_Weapon&appid=730";

/// Number of unique listings to collect before stopping
pub const DEFAULT_TARGET: usize = 1141;

/// Listings per result page; the `start` offset advances by this much
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Known page count of the default search (1141 listings / 10 per page)
pub const DEFAULT_MAX_PAGES: u32 = 115;

/// Total passes over the page window, first sweep included
///
/// `2` allows exactly one restart from page 0 when the target was missed.
pub const DEFAULT_MAX_SWEEPS: u32 = 2;

/// Attempts per page before it is counted as failed
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Timeout for `page.goto()` in seconds
pub const DEFAULT_PAGE_LOAD_TIMEOUT_SECS: u64 = 30;

/// How long to wait for the listing marker to render, in seconds
pub const DEFAULT_MARKER_TIMEOUT_SECS: u64 = 10;

/// Poll interval while waiting for the marker selector
pub const MARKER_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Settle pause after the marker appears (async price widgets fill in late)
pub const DEFAULT_SETTLE_DELAY_MIN: Duration = Duration::from_secs(3);
pub const DEFAULT_SETTLE_DELAY_MAX: Duration = Duration::from_secs(6);

/// Backoff between failed attempts
///
/// Longer than the settle pause: the market answers rapid retries with 429s.
pub const DEFAULT_BACKOFF_DELAY_MIN: Duration = Duration::from_secs(6);
pub const DEFAULT_BACKOFF_DELAY_MAX: Duration = Duration::from_secs(10);

/// Default output table
pub const DEFAULT_OUTPUT_PATH: &str = "all_skins.csv";

/// Column header of the output table
pub const OUTPUT_COLUMNS: [&str; 3] = ["skin_name", "price", "link"];

/// Placeholder for a listing that renders without a price
pub const PRICE_SENTINEL: &str = "N/A";

/// `<a>` wrapping one listing row; also the render-complete marker
pub const ROW_SELECTOR: &str = "a.market_listing_row_link";

/// Listing display name inside a row
pub const NAME_SELECTOR: &str = "span.market_listing_item_name";

/// Listing sale price inside a row
pub const PRICE_SELECTOR: &str = "span.sale_price";

/// Attribute on the row element holding the listing URL
pub const LINK_ATTRIBUTE: &str = "href";

/// Query parameter carrying the result offset
pub const START_PARAM: &str = "start";
