//! Read a statement CSV (header row + data rows) into [`RawRow`]s.

use std::io::Read;

use thiserror::Error;

use crate::types::{RawRow, normalize_header};

#[derive(Debug, Error)]
pub enum StatementError {
    #[error("statement has no header row")]
    MissingHeader,
    #[error("malformed statement CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// A parsed statement: normalized headers and the data rows in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Statement {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

impl Statement {
    /// Parse CSV with a header row. Short rows leave trailing columns absent,
    /// surplus cells are ignored and rows with only blank cells are skipped.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, StatementError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = rdr.headers()?.iter().map(normalize_header).collect();
        if headers.iter().all(String::is_empty) {
            return Err(StatementError::MissingHeader);
        }

        let mut rows = Vec::new();
        for result in rdr.records() {
            let record = result?;
            let row = RawRow::from_pairs(
                headers
                    .iter()
                    .zip(record.iter())
                    .filter(|(h, _)| !h.is_empty()),
            );
            if row.is_blank() {
                continue;
            }
            rows.push(row);
        }

        Ok(Statement { headers, rows })
    }

    pub fn from_csv_str(text: &str) -> Result<Self, StatementError> {
        Self::from_reader(text.as_bytes())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
