use crate::domain::listing::NAN;
use crate::domain::{Field, ListingRecord};
use crate::errors::AppError;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Outcome of one export.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WriteSummary {
    pub written: usize,
    pub skipped: usize,
}

/// A record that does not fit the header it is written under.
#[derive(Debug, Error)]
pub enum RowError {
    #[error("fields not in header: {0}")]
    UnknownFields(String),
}

/// Writes the result set as CSV: the listing columns, then any configured
/// extra columns.
pub struct CsvExporter {
    path: PathBuf,
    extra_columns: Vec<String>,
}

impl CsvExporter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            extra_columns: Vec::new(),
        }
    }

    /// Extra columns after the listing columns. Names that already are a
    /// listing column (ignoring case) are dropped with a warning.
    pub fn with_extra_columns(mut self, columns: Vec<String>) -> Self {
        self.extra_columns = columns
            .into_iter()
            .filter(|column| match Field::from_column(column) {
                Some(field) => {
                    log::warn!("Extra column {column:?} duplicates {:?}, ignored", field.column());
                    false
                }
                None => true,
            })
            .collect();
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn header(&self) -> Vec<&str> {
        let mut header: Vec<&str> = Field::ALL.iter().map(|f| f.column()).collect();
        header.extend(self.extra_columns.iter().map(String::as_str));
        header
    }

    /// Writes every well-formed record. Rows that do not fit the header are
    /// skipped with a warning. An empty result set writes nothing and leaves
    /// any existing file alone.
    pub fn export(&self, records: &[ListingRecord]) -> Result<Option<WriteSummary>, AppError> {
        if records.is_empty() {
            log::info!("No listings collected, {} left untouched", self.path.display());
            return Ok(None);
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let header = self.header();
        let mut writer = csv::Writer::from_path(&self.path)?;
        writer.write_record(&header)?;

        let mut summary = WriteSummary::default();
        for (i, record) in records.iter().enumerate() {
            match row_for(record, &header) {
                Ok(row) => {
                    writer.write_record(&row)?;
                    summary.written += 1;
                }
                Err(e) => {
                    log::warn!("Skipping row {} due to error: {e}", i + 1);
                    summary.skipped += 1;
                }
            }
        }
        writer.flush()?;

        log::info!(
            "✅ Wrote {} rows to {} ({} skipped)",
            summary.written,
            self.path.display(),
            summary.skipped
        );
        Ok(Some(summary))
    }
}

fn row_for<'a>(record: &'a ListingRecord, header: &[&str]) -> Result<Vec<&'a str>, RowError> {
    let unknown: Vec<&str> = record
        .extras
        .keys()
        .map(String::as_str)
        .filter(|key| !header.contains(key))
        .collect();

    if !unknown.is_empty() {
        return Err(RowError::UnknownFields(unknown.join(", ")));
    }

    Ok(header
        .iter()
        .map(|column| record.value(column).unwrap_or(NAN))
        .collect())
}
