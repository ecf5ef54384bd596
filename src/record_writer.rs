//! Incremental output table
//!
//! Every page's novel records are appended as soon as they are accepted, so
//! an interrupted run keeps everything it found. The file is only ever opened
//! in append mode; the header row is written when the file is new or empty.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

use crate::record_extractor::Record;
use crate::utils::OUTPUT_COLUMNS;

#[derive(Debug, Error)]
pub enum WriterError {
    #[error("Output I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Destination for accepted records
pub trait RecordSink {
    /// Append exactly `records`, in order
    fn append(&mut self, records: &[Record]) -> Result<(), WriterError>;
}

/// CSV table appended to across the whole run
///
/// The handle stays open between calls and is flushed after each one, so the
/// bytes on disk match what reopening per call would have produced.
pub struct IncrementalWriter {
    path: PathBuf,
    writer: csv::Writer<File>,
    rows_written: u64,
}

impl IncrementalWriter {
    /// Open `path` for appending, creating it with a header row when needed
    pub fn open(path: impl AsRef<Path>) -> Result<Self, WriterError> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let existing_len = match std::fs::metadata(&path) {
            Ok(meta) => meta.len(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => 0,
            Err(e) => return Err(e.into()),
        };

        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        if existing_len == 0 {
            writer.write_record(OUTPUT_COLUMNS)?;
            writer.flush()?;
        }

        Ok(Self {
            path,
            writer,
            rows_written: 0,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Data rows appended through this handle
    #[must_use]
    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }
}

impl RecordSink for IncrementalWriter {
    fn append(&mut self, records: &[Record]) -> Result<(), WriterError> {
        for record in records {
            self.writer.serialize(record)?;
        }
        self.writer.flush()?;
        self.rows_written += records.len() as u64;

        info!("Saved {} skins to {}.", records.len(), self.path.display());
        Ok(())
    }
}
