//! Import reports

use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

/// Why an imported row was not applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Both identifier columns are missing or empty
    MissingIdentifier,
    /// No dialogue text or choice node carries the row's identifiers
    Unmatched,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingIdentifier => write!(f, "no identifier"),
            SkipReason::Unmatched => write!(f, "no matching record"),
        }
    }
}

/// A row that was skipped during import
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRow {
    /// 1-based row number; the header is row 1
    pub row: usize,
    pub reason: SkipReason,
}

/// Outcome of importing a localization table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportReport {
    /// When the import ran
    pub imported_at: DateTime<Utc>,
    /// Rows after the header
    pub rows_seen: usize,
    /// Rows that updated at least one record
    pub rows_matched: usize,
    /// Language slots written
    pub cells_written: usize,
    pub skipped_rows: Vec<SkippedRow>,
}

impl ImportReport {
    /// Create an empty report stamped with the current time
    pub fn new() -> Self {
        Self {
            imported_at: Utc::now(),
            rows_seen: 0,
            rows_matched: 0,
            cells_written: 0,
            skipped_rows: Vec::new(),
        }
    }

    /// Record a skipped row
    pub fn skip(&mut self, row: usize, reason: SkipReason) {
        self.skipped_rows.push(SkippedRow { row, reason });
    }

    /// Save the report to JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}

impl Default for ImportReport {
    fn default() -> Self {
        Self::new()
    }
}
