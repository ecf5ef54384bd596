use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

use crate::utils::{LINK_ATTRIBUTE, NAME_SELECTOR, PRICE_SELECTOR, ROW_SELECTOR};

/// CSS locators describing where a listing's fields live
///
/// `name` and `price` are resolved inside each `row` match; `link_attribute`
/// is read from the row element itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionRules {
    pub row: String,
    pub name: String,
    pub price: String,
    pub link_attribute: String,
}

impl Default for ExtractionRules {
    fn default() -> Self {
        Self {
            row: ROW_SELECTOR.to_string(),
            name: NAME_SELECTOR.to_string(),
            price: PRICE_SELECTOR.to_string(),
            link_attribute: LINK_ATTRIBUTE.to_string(),
        }
    }
}

impl ExtractionRules {
    pub(crate) fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("row", &self.row),
            ("name", &self.name),
            ("price", &self.price),
            ("link_attribute", &self.link_attribute),
        ] {
            if value.trim().is_empty() {
                bail!("extraction rule '{field}' must not be blank");
            }
        }
        Ok(())
    }
}
