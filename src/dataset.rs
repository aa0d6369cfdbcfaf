// Dataset Loader - Superstore transactions CSV → read-only in-memory table
//
// The table is built once at startup and shared (behind an Arc) by every
// binding. Nothing writes to it afterwards.

use crate::aggregate::distinct_in_order;
use chrono::NaiveDate;
use csv::{ByteRecord, StringRecord};
use serde::{Deserialize, Deserializer, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Format of the `Order Date` column (month/day/four-digit-year)
pub const ORDER_DATE_FORMAT: &str = "%m/%d/%Y";

/// Columns the loader needs; any other column in the file is ignored
pub const REQUIRED_COLUMNS: [&str; 7] = [
    "Order Date",
    "Region",
    "Category",
    "Sub-Category",
    "Segment",
    "Sales",
    "Profit",
];

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing required column '{0}'")]
    MissingColumn(String),

    #[error("invalid row at line {line}: {source}")]
    Row {
        line: u64,
        #[source]
        source: csv::Error,
    },

    #[error("dataset contains no transactions")]
    Empty,
}

// ============================================================================
// TRANSACTION
// ============================================================================

/// One retail transaction (only the columns the dashboard reads)
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Transaction {
    #[serde(rename = "Order Date", deserialize_with = "deserialize_order_date")]
    pub order_date: NaiveDate,

    #[serde(rename = "Region")]
    pub region: String,

    #[serde(rename = "Category")]
    pub category: String,

    #[serde(rename = "Sub-Category")]
    pub sub_category: String,

    #[serde(rename = "Segment")]
    pub segment: String,

    #[serde(rename = "Sales")]
    pub sales: f64,

    #[serde(rename = "Profit")]
    pub profit: f64,
}

fn deserialize_order_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    NaiveDate::parse_from_str(&raw, ORDER_DATE_FORMAT).map_err(|e| {
        serde::de::Error::custom(format!(
            "Order Date '{}' is not month/day/year: {}",
            raw, e
        ))
    })
}

// ============================================================================
// TRANSACTION TABLE
// ============================================================================

/// Ordered, immutable collection of transactions in file order
#[derive(Debug, Clone)]
pub struct TransactionTable {
    records: Vec<Transaction>,
    min_date: NaiveDate,
    max_date: NaiveDate,
}

impl TransactionTable {
    /// Build a table from already-parsed records. Fails on an empty set,
    /// since the dashboard cannot derive its initial control values from it.
    pub fn from_records(records: Vec<Transaction>) -> Result<Self, LoadError> {
        let mut dates = records.iter().map(|tx| tx.order_date);
        let first = dates.next().ok_or(LoadError::Empty)?;
        let (min_date, max_date) = dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)));

        Ok(Self {
            records,
            min_date,
            max_date,
        })
    }

    /// Parse a Latin-1 encoded CSV stream with a header row
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, LoadError> {
        let mut rdr = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);

        let headers = decode_record(rdr.byte_headers()?);
        for column in REQUIRED_COLUMNS {
            if !headers.iter().any(|h| h == column) {
                return Err(LoadError::MissingColumn(column.to_string()));
            }
        }

        let mut records = Vec::new();
        let mut raw = ByteRecord::new();

        loop {
            match rdr.read_byte_record(&mut raw) {
                Ok(true) => {}
                Ok(false) => break,
                // short and long rows are reported against their line
                Err(source) if !source.is_io_error() => {
                    let line = source.position().map(|p| p.line()).unwrap_or_default();
                    return Err(LoadError::Row { line, source });
                }
                Err(source) => return Err(LoadError::Csv(source)),
            }

            let line = raw.position().map(|p| p.line()).unwrap_or_default();
            let record = decode_record(&raw);
            let transaction: Transaction = record
                .deserialize(Some(&headers))
                .map_err(|source| LoadError::Row { line, source })?;
            records.push(transaction);
        }

        debug!(rows = records.len(), "parsed transaction rows");
        Self::from_records(records)
    }

    pub fn records(&self) -> &[Transaction] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Transaction> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Earliest and latest order date present in the data
    pub fn date_bounds(&self) -> (NaiveDate, NaiveDate) {
        (self.min_date, self.max_date)
    }

    /// Distinct regions, first-seen order
    pub fn regions(&self) -> Vec<&str> {
        distinct_in_order(self.records.iter().map(|tx| tx.region.as_str()))
    }

    /// Distinct categories, first-seen order
    pub fn categories(&self) -> Vec<&str> {
        distinct_in_order(self.records.iter().map(|tx| tx.category.as_str()))
    }
}

impl<'a> IntoIterator for &'a TransactionTable {
    type Item = &'a Transaction;
    type IntoIter = std::slice::Iter<'a, Transaction>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Every Latin-1 byte maps to the Unicode code point of the same value
fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

fn decode_record(record: &ByteRecord) -> StringRecord {
    record.iter().map(decode_latin1).collect()
}

/// Load the transaction table from a CSV file on disk
pub fn load_csv(csv_path: &Path) -> Result<TransactionTable, LoadError> {
    let file = File::open(csv_path).map_err(|source| LoadError::Open {
        path: csv_path.to_path_buf(),
        source,
    })?;

    let table = TransactionTable::from_reader(file)?;
    let (min_date, max_date) = table.date_bounds();

    info!(
        path = %csv_path.display(),
        rows = table.len(),
        %min_date,
        %max_date,
        "loaded transactions"
    );

    Ok(table)
}
