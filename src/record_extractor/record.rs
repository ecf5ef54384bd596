use serde::{Deserialize, Serialize};

use crate::utils::PRICE_SENTINEL;

/// One scraped listing
///
/// Field order matches the output table columns `skin_name, price, link`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "skin_name")]
    pub name: String,
    /// Display price as rendered, or `"N/A"` when the listing shows none
    pub price: String,
    pub link: String,
}

impl Record {
    #[must_use]
    pub fn new(name: impl Into<String>, price: Option<String>, link: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            price: price.unwrap_or_else(|| PRICE_SENTINEL.to_string()),
            link: link.into(),
        }
    }

    #[must_use]
    pub fn has_price(&self) -> bool {
        self.price != PRICE_SENTINEL
    }
}
