use std::path::PathBuf;
use thiserror::Error;

use crate::domain::{Amount, LedgerKind, RowError};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid category: {0:?}")]
    InvalidCategory(String),

    #[error("Total of {0} exceeds the largest representable amount")]
    Overflow(String),

    #[error("Export of {kind} ledger failed while writing: {source}")]
    ExportWrite {
        kind: LedgerKind,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error in {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Unexpected columns in {} ledger {}: expected {expected:?}, found {found:?}", .kind, .path.display())]
    Schema {
        kind: LedgerKind,
        path: PathBuf,
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("Invalid row at line {line} of {}: {reason}", .path.display())]
    InvalidRow {
        path: PathBuf,
        line: u64,
        reason: RowError,
    },
}

impl AppError {
    pub fn negative_amount(amount: Amount) -> Self {
        AppError::Validation(format!("amount must not be negative (got {})", amount))
    }

    /// A record whose stored form would not read back.
    pub fn unstorable(reason: RowError) -> Self {
        match reason {
            RowError::InvalidCategory(name) => AppError::InvalidCategory(name),
            other => AppError::Validation(format!("record cannot be stored: {}", other)),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AppError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        AppError::Csv {
            path: path.into(),
            source,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::Validation(_) | AppError::InvalidCategory(_))
    }
}
