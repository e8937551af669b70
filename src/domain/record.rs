use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::fmt;

use super::{Amount, parse_amount};

/// Layout used when writing timestamps. Matches what spreadsheet tools and
/// dataframe libraries emit for a local wall-clock time.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Number of columns every ledger table carries.
pub const COLUMN_COUNT: usize = 4;

/// The two kinds of ledger this system keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LedgerKind {
    Invoices,
    Expenses,
}

impl LedgerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LedgerKind::Invoices => "invoices",
            LedgerKind::Expenses => "expenses",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "invoices" | "invoice" => Some(LedgerKind::Invoices),
            "expenses" | "expense" => Some(LedgerKind::Expenses),
            _ => None,
        }
    }

    /// Name of the second column, which is the only one that differs by kind.
    pub fn party_column(&self) -> &'static str {
        match self {
            LedgerKind::Invoices => "Client",
            LedgerKind::Expenses => "Category",
        }
    }

    /// Header row for a table of this kind.
    pub fn columns(&self, currency: &str) -> [String; COLUMN_COUNT] {
        [
            "Date".to_string(),
            self.party_column().to_string(),
            "Description".to_string(),
            format!("Amount ({})", currency),
        ]
    }

    /// File name offered when a table is downloaded.
    pub fn export_file_name(&self) -> String {
        format!("{}.csv", self.as_str())
    }
}

impl fmt::Display for LedgerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A typed row of one ledger kind.
///
/// Implementors define how a record maps onto the four CSV columns; the
/// storage layer handles files, headers and ordering.
pub trait LedgerRecord: Sized + Clone {
    const KIND: LedgerKind;

    fn amount(&self) -> Amount;

    fn to_fields(&self) -> [String; COLUMN_COUNT];

    fn from_fields(fields: [&str; COLUMN_COUNT]) -> Result<Self, RowError>;
}

/// Numeric fields that can be aggregated across a ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SumField {
    #[default]
    Amount,
}

impl SumField {
    pub fn value_of<R: LedgerRecord>(&self, record: &R) -> Amount {
        match self {
            SumField::Amount => record.amount(),
        }
    }
}

/// Why a single row could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowError {
    InvalidTimestamp(String),
    InvalidAmount(String),
    InvalidCategory(String),
}

impl fmt::Display for RowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowError::InvalidTimestamp(s) => write!(f, "invalid date '{}'", s),
            RowError::InvalidAmount(s) => write!(f, "invalid amount '{}'", s),
            RowError::InvalidCategory(s) => write!(f, "invalid category '{}'", s),
        }
    }
}

impl std::error::Error for RowError {}

pub fn format_timestamp(timestamp: &NaiveDateTime) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse a stored timestamp. Accepts full timestamps with or without
/// fractional seconds, and bare dates (taken as midnight).
pub fn parse_timestamp(input: &str) -> Result<NaiveDateTime, RowError> {
    let input = input.trim();
    NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S%.f"))
        .or_else(|_| {
            NaiveDate::parse_from_str(input, "%Y-%m-%d").map(|d| d.and_time(NaiveTime::default()))
        })
        .map_err(|_| RowError::InvalidTimestamp(input.to_string()))
}

pub(crate) fn parse_stored_amount(input: &str) -> Result<Amount, RowError> {
    parse_amount(input).map_err(|_| RowError::InvalidAmount(input.trim().to_string()))
}
