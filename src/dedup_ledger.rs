//! Dedup ledger: the set of listing identities seen during one run
//!
//! A record's identity is its full `(name, price, link)` triple. Two listings
//! that render the same name and price are still distinct when their links
//! differ, so the link is always part of the key.
//!
//! The set is a `DashSet` so `claim()` is a single atomic test-and-insert even
//! when the ledger is shared behind an `Arc` by several workers.

use dashmap::DashSet;
use std::path::Path;
use tracing::{info, warn};

use crate::record_extractor::Record;
use crate::record_writer::WriterError;

/// Key a record is deduplicated by
///
/// Field values are length-prefixed so no choice of separator inside a name
/// can make two different triples collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdentityKey(String);

impl IdentityKey {
    #[must_use]
    pub fn of(record: &Record) -> Self {
        let mut key = String::with_capacity(record.name.len() + record.price.len() + record.link.len() + 16);
        for field in [&record.name, &record.price, &record.link] {
            key.push_str(&field.len().to_string());
            key.push(':');
            key.push_str(field);
        }
        Self(key)
    }
}

impl From<&Record> for IdentityKey {
    fn from(record: &Record) -> Self {
        Self::of(record)
    }
}

/// Monotonically growing identity set for one crawl run
#[derive(Debug, Default)]
pub struct DedupLedger {
    seen: DashSet<IdentityKey>,
}

impl DedupLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `record` has not been seen yet
    #[must_use]
    pub fn is_novel(&self, record: &Record) -> bool {
        !self.seen.contains(&IdentityKey::of(record))
    }

    /// Mark `record` as seen
    pub fn record(&self, record: &Record) {
        self.seen.insert(IdentityKey::of(record));
    }

    /// Test and insert in one step; `true` means the caller owns this record
    ///
    /// Of any number of concurrent claims for the same identity exactly one
    /// returns `true`.
    pub fn claim(&self, record: &Record) -> bool {
        self.seen.insert(IdentityKey::of(record))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    /// Seed from the rows of an existing output table
    ///
    /// Returns the number of distinct identities added. A missing file seeds
    /// nothing. Unreadable rows are skipped with a warning; an unreadable file
    /// is an error.
    pub fn seed_from_csv(&self, path: &Path) -> Result<usize, WriterError> {
        if !path.exists() {
            return Ok(0);
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(path)?;

        let mut added = 0;
        for (line, row) in reader.deserialize::<Record>().enumerate() {
            match row {
                Ok(record) => {
                    if self.claim(&record) {
                        added += 1;
                    }
                }
                Err(e) => warn!("Skipping unreadable row {} in {}: {}", line + 2, path.display(), e),
            }
        }

        info!("Seeded ledger with {} records from {}", added, path.display());
        Ok(added)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, price: &str, link: &str) -> Record {
        Record::new(name, Some(price.to_string()), link)
    }

    #[test]
    fn claim_accepts_once() {
        let ledger = DedupLedger::new();
        let r = record("AK-47 | Safari Mesh", "$0.10", "/listings/730/1");
        assert!(ledger.is_novel(&r));
        assert!(ledger.claim(&r));
        assert!(!ledger.is_novel(&r));
        assert!(!ledger.claim(&r));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn separator_in_fields_cannot_collide() {
        let a = record("a_b", "c", "d");
        let b = record("a", "b_c", "d");
        assert_ne!(IdentityKey::of(&a), IdentityKey::of(&b));
    }

    #[test]
    fn record_then_is_novel_agree() {
        let ledger = DedupLedger::new();
        let r = record("MP9 | Sand Dashed", "N/A", "/listings/730/2");
        ledger.record(&r);
        assert!(!ledger.is_novel(&r));
    }
}
