use scraper::{ElementRef, Html, Selector};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::record::Record;
use super::rules::ExtractionRules;

#[derive(Debug, Error)]
pub enum ExtractorError {
    #[error("Invalid {field} selector '{selector}': {reason}")]
    InvalidSelector {
        field: &'static str,
        selector: String,
        reason: String,
    },
}

/// A row that matched the row selector but could not become a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionAnomaly {
    /// Name element absent or its text empty
    MissingName { position: usize },
    /// Link attribute absent or empty
    MissingLink { position: usize, name: String },
}

impl std::fmt::Display for ExtractionAnomaly {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingName { position } => write!(f, "row {position}: name element missing"),
            Self::MissingLink { position, name } => {
                write!(f, "row {position} ('{name}'): link attribute missing")
            }
        }
    }
}

/// Candidate records of one page, in document order
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub records: Vec<Record>,
    pub anomalies: Vec<ExtractionAnomaly>,
}

impl Extraction {
    /// Rows matched by the row selector, good or not
    #[must_use]
    pub fn rows_seen(&self) -> usize {
        self.records.len() + self.anomalies.len()
    }
}

/// Parses listing markup with pre-compiled selectors
#[derive(Debug, Clone)]
pub struct RecordExtractor {
    row: Selector,
    name: Selector,
    price: Selector,
    link_attribute: String,
}

impl RecordExtractor {
    /// Compile the selectors of `rules`
    ///
    /// Selectors are compiled once per run so a typo fails at startup rather
    /// than silently yielding empty pages.
    pub fn new(rules: &ExtractionRules) -> Result<Self, ExtractorError> {
        Ok(Self {
            row: compile("row", &rules.row)?,
            name: compile("name", &rules.name)?,
            price: compile("price", &rules.price)?,
            link_attribute: rules.link_attribute.clone(),
        })
    }

    /// Extract every listing row from `markup`
    #[must_use]
    pub fn extract(&self, markup: &str) -> Extraction {
        let document = Html::parse_document(markup);
        let mut extraction = Extraction::default();

        for (index, row) in document.select(&self.row).enumerate() {
            let position = index + 1;
            match self.extract_row(row, position) {
                Ok(record) => {
                    debug!("Extracted listing: {} - {}", record.name, record.price);
                    extraction.records.push(record);
                }
                Err(anomaly) => {
                    warn!("Error extracting item: {anomaly}");
                    extraction.anomalies.push(anomaly);
                }
            }
        }

        info!("Found {} items on this page.", extraction.rows_seen());
        extraction
    }

    fn extract_row(&self, row: ElementRef<'_>, position: usize) -> Result<Record, ExtractionAnomaly> {
        let name = row
            .select(&self.name)
            .next()
            .map(element_text)
            .filter(|text| !text.is_empty())
            .ok_or(ExtractionAnomaly::MissingName { position })?;

        let price = row
            .select(&self.price)
            .next()
            .map(element_text)
            .filter(|text| !text.is_empty());

        let link = row
            .value()
            .attr(&self.link_attribute)
            .map(str::trim)
            .filter(|href| !href.is_empty())
            .ok_or_else(|| ExtractionAnomaly::MissingLink {
                position,
                name: name.clone(),
            })?;

        Ok(Record::new(name, price, link))
    }
}

fn compile(field: &'static str, selector: &str) -> Result<Selector, ExtractorError> {
    Selector::parse(selector).map_err(|e| ExtractorError::InvalidSelector {
        field,
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}

/// Trimmed text content with inner whitespace runs collapsed
fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> RecordExtractor {
        RecordExtractor::new(&ExtractionRules::default()).unwrap()
    }

    #[test]
    fn text_whitespace_is_collapsed() {
        let html = r#"<a class="market_listing_row_link" href="/l/1">
            <span class="market_listing_item_name">
                P250 |
                Sand Dune
            </span>
            <span class="sale_price">  $0.03  </span>
        </a>"#;
        let extraction = extractor().extract(html);
        assert_eq!(extraction.records[0].name, "P250 | Sand Dune");
        assert_eq!(extraction.records[0].price, "$0.03");
    }

    #[test]
    fn row_without_href_is_an_anomaly() {
        let html = r#"<a class="market_listing_row_link">
            <span class="market_listing_item_name">Nova | Polar Mesh</span>
        </a>"#;
        let extraction = extractor().extract(html);
        assert!(extraction.records.is_empty());
        assert_eq!(
            extraction.anomalies,
            vec![ExtractionAnomaly::MissingLink {
                position: 1,
                name: "Nova | Polar Mesh".to_string()
            }]
        );
    }

    #[test]
    fn invalid_selector_is_rejected() {
        let rules = ExtractionRules {
            row: "a[".to_string(),
            ..ExtractionRules::default()
        };
        let err = RecordExtractor::new(&rules).unwrap_err();
        assert!(matches!(err, ExtractorError::InvalidSelector { field: "row", .. }));
    }
}
