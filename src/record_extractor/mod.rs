//! Listing record extraction
//!
//! Turns rendered markup into candidate [`Record`]s. Extraction is
//! element-tolerant: a row missing a required field is reported as an
//! [`ExtractionAnomaly`] and skipped; the rest of the page still yields.

mod extractor;
mod record;
mod rules;

pub use extractor::{Extraction, ExtractionAnomaly, ExtractorError, RecordExtractor};
pub use record::Record;
pub use rules::ExtractionRules;
