//! URL helpers for paginated listing searches.

use url::Url;

use super::constants::START_PARAM;

/// Build the URL of one result page.
///
/// Appends `start=<page_index * page_size>` to the base search URL. A `start`
/// pair already present in the base URL is dropped so the offset is never
/// duplicated. Every other filter pair is kept in order.
#[must_use]
pub fn page_url(base: &Url, page_index: u32, page_size: u32) -> Url {
    let offset = u64::from(page_index) * u64::from(page_size);
    let mut url = base.clone();

    let has_start = base.query_pairs().any(|(k, _)| k == START_PARAM);
    if has_start {
        let kept: Vec<(String, String)> = base
            .query_pairs()
            .filter(|(k, _)| k != START_PARAM)
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        url.query_pairs_mut().clear().extend_pairs(kept);
    }

    url.query_pairs_mut()
        .append_pair(START_PARAM, &offset.to_string());
    url
}

/// Check that a URL can be loaded by the browser
#[must_use]
pub fn is_valid_url(url: &str) -> bool {
    if url.is_empty() {
        return false;
    }

    match Url::parse(url) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https"),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_is_page_index_times_page_size() {
        let base = Url::parse("https://example.com/market/search?q=&appid=730").unwrap();
        let url = page_url(&base, 3, 10);
        assert_eq!(url.as_str(), "https://example.com/market/search?q=&appid=730&start=30");
    }

    #[test]
    fn first_page_starts_at_zero() {
        let base = Url::parse("https://example.com/search?appid=730").unwrap();
        assert!(page_url(&base, 0, 10).as_str().ends_with("appid=730&start=0"));
    }

    #[test]
    fn existing_start_param_is_replaced() {
        let base = Url::parse("https://example.com/search?start=90&appid=730").unwrap();
        let url = page_url(&base, 1, 10);
        let starts: Vec<_> = url.query_pairs().filter(|(k, _)| k == "start").collect();
        assert_eq!(starts.len(), 1);
        assert_eq!(starts[0].1, "10");
        assert!(url.query_pairs().any(|(k, v)| k == "appid" && v == "730"));
    }

    #[test]
    fn rejects_non_http_schemes() {
        assert!(is_valid_url("https://steamcommunity.com/market/search"));
        assert!(!is_valid_url("ftp://example.com"));
        assert!(!is_valid_url(""));
        assert!(!is_valid_url("not a url"));
    }
}
