//! CSV encoding and decoding of ledger tables.
//!
//! A table is a header row followed by one row per record. These helpers
//! work on any reader or writer so the same code serves files on disk and
//! exported bytes.

use std::io::{Read, Write};
use std::path::Path;

use crate::application::AppError;
use crate::domain::{COLUMN_COUNT, LedgerRecord};

/// Reads every record from `reader`, checking the header against `columns`.
/// `path` is only used to label errors.
pub fn read_records<R, Rd>(
    reader: Rd,
    columns: &[String; COLUMN_COUNT],
    path: &Path,
) -> Result<Vec<R>, AppError>
where
    R: LedgerRecord,
    Rd: Read,
{
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|e| AppError::csv(path, e))?
        .clone();

    if headers.is_empty() {
        tracing::warn!(path = %path.display(), "ledger file has no header row");
        return Ok(Vec::new());
    }

    let found: Vec<String> = headers.iter().map(|h| h.trim().to_string()).collect();
    if found.as_slice() != columns.as_slice() {
        return Err(AppError::Schema {
            kind: R::KIND,
            path: path.to_path_buf(),
            expected: columns.to_vec(),
            found,
        });
    }

    let mut records = Vec::new();
    for result in csv_reader.records() {
        let row = result.map_err(|e| AppError::csv(path, e))?;
        let line = row.position().map(|p| p.line()).unwrap_or_default();

        let fields = [
            row.get(0).unwrap_or(""),
            row.get(1).unwrap_or(""),
            row.get(2).unwrap_or(""),
            row.get(3).unwrap_or(""),
        ];
        let record = R::from_fields(fields).map_err(|reason| AppError::InvalidRow {
            path: path.to_path_buf(),
            line,
            reason,
        })?;
        records.push(record);
    }

    Ok(records)
}

/// Writes the header row followed by `records`, then flushes.
pub fn write_records<R, W>(
    writer: W,
    columns: &[String; COLUMN_COUNT],
    records: &[R],
) -> csv::Result<W>
where
    R: LedgerRecord,
    W: Write,
{
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(columns)?;
    for record in records {
        csv_writer.write_record(record.to_fields())?;
    }
    csv_writer.flush()?;
    csv_writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ExpenseCategory, ExpenseRecord, InvoiceRecord, LedgerKind, parse_timestamp};
    use rust_decimal_macros::dec;

    fn invoice_columns() -> [String; COLUMN_COUNT] {
        LedgerKind::Invoices.columns("UGX")
    }

    #[test]
    fn test_write_header_only() {
        let bytes = write_records::<InvoiceRecord, _>(Vec::new(), &invoice_columns(), &[]).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "Date,Client,Description,Amount (UGX)\n"
        );
    }

    #[test]
    fn test_write_quotes_embedded_commas() {
        let ts = parse_timestamp("2024-01-02 03:04:05").unwrap();
        let invoice = InvoiceRecord::new(ts, "Acme, Inc.", "Logo \"v2\"", dec!(75000));
        let bytes = write_records(Vec::new(), &invoice_columns(), &[invoice]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.ends_with(
            "2024-01-02 03:04:05.000000,\"Acme, Inc.\",\"Logo \"\"v2\"\"\",75000\n"
        ));
    }

    #[test]
    fn test_read_tabular_export() {
        // Shape produced by dataframe tools: microsecond timestamps, float amounts.
        let data = "Date,Category,Description,Amount (UGX)\n\
                    2024-05-01 10:00:00.123456,Office,Printer paper,25000\n\
                    2024-05-02 11:30:00.000001,Transport,Taxi,15000.0\n";
        let records: Vec<ExpenseRecord> = read_records(
            data.as_bytes(),
            &LedgerKind::Expenses.columns("UGX"),
            Path::new("expenses.csv"),
        )
        .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].category, ExpenseCategory::Office);
        assert_eq!(records[1].amount, dec!(15000));
    }

    #[test]
    fn test_read_rejects_wrong_header() {
        let data = "Date,Client,Description,Amount (USD)\n";
        let result: Result<Vec<InvoiceRecord>, _> =
            read_records(data.as_bytes(), &invoice_columns(), Path::new("invoices.csv"));
        assert!(matches!(result, Err(AppError::Schema { .. })));
    }

    #[test]
    fn test_read_reports_bad_row_line() {
        let data = "Date,Client,Description,Amount (UGX)\n\
                    2024-05-01,Acme,Ok,100\n\
                    2024-05-02,Acme,Broken,ten\n";
        let result: Result<Vec<InvoiceRecord>, _> =
            read_records(data.as_bytes(), &invoice_columns(), Path::new("invoices.csv"));
        match result {
            Err(AppError::InvalidRow { line, .. }) => assert_eq!(line, 3),
            other => panic!("expected InvalidRow, got {:?}", other),
        }
    }

    #[test]
    fn test_read_empty_input() {
        let records: Vec<InvoiceRecord> =
            read_records(&b""[..], &invoice_columns(), Path::new("invoices.csv")).unwrap();
        assert!(records.is_empty());
    }
}
