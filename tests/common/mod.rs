// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime};
use ledgerbook::application::LedgerService;
use ledgerbook::config::Config;
use ledgerbook::domain::{Amount, ExpenseCategory, NewExpense, NewInvoice};
use tempfile::TempDir;

/// Helper to create a test service with ledgers in a temporary directory
pub fn test_service() -> Result<(LedgerService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let config = test_config(&temp_dir);
    let service = LedgerService::init(&config)?;
    Ok((service, temp_dir))
}

/// Default configuration rooted in `temp_dir`
pub fn test_config(temp_dir: &TempDir) -> Config {
    Config::with_data_dir(temp_dir.path().join("data"))
}

/// Helper to parse a date string into a midnight timestamp
pub fn parse_date(date_str: &str) -> NaiveDateTime {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

pub fn invoice(client: &str, amount: Amount, date: &str) -> NewInvoice {
    NewInvoice::new(client, amount).with_timestamp(parse_date(date))
}

pub fn expense(category: ExpenseCategory, amount: Amount, date: &str) -> NewExpense {
    NewExpense::new(category, amount).with_timestamp(parse_date(date))
}
