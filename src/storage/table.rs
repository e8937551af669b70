use std::fs::{self, File};
use std::io::{self, BufReader};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::application::AppError;
use crate::domain::{Amount, COLUMN_COUNT, LedgerKind, LedgerRecord, SumField, checked_total};

use super::codec::{read_records, write_records};

/// One append-only ledger persisted as a CSV file.
///
/// Every append rewrites the whole table into a temporary file next to the
/// original and renames it into place, so the file on disk is always a
/// complete table. Appends through the same `LedgerTable` are serialized;
/// separate processes are not coordinated (last writer wins).
pub struct LedgerTable<R: LedgerRecord> {
    path: PathBuf,
    columns: [String; COLUMN_COUNT],
    write_lock: Mutex<()>,
    _record: PhantomData<fn() -> R>,
}

impl<R: LedgerRecord> LedgerTable<R> {
    pub fn new(path: impl Into<PathBuf>, currency: &str) -> Self {
        Self {
            path: path.into(),
            columns: R::KIND.columns(currency),
            write_lock: Mutex::new(()),
            _record: PhantomData,
        }
    }

    pub fn kind(&self) -> LedgerKind {
        R::KIND
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn columns(&self) -> &[String; COLUMN_COUNT] {
        &self.columns
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Create the table with only its header row if the file is absent.
    /// Returns true when the file was created.
    pub fn ensure(&self) -> Result<bool, AppError> {
        let _guard = self.lock();

        if self.exists() {
            tracing::debug!(kind = %R::KIND, path = %self.path.display(), "ledger already present");
            return Ok(false);
        }

        self.write_atomic(&[])?;
        tracing::info!(kind = %R::KIND, path = %self.path.display(), "created empty ledger");
        Ok(true)
    }

    /// All records, oldest first. A missing file reads as an empty ledger.
    pub fn read_all(&self) -> Result<Vec<R>, AppError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(kind = %R::KIND, path = %self.path.display(), "ledger missing, reading as empty");
                return Ok(Vec::new());
            }
            Err(e) => return Err(AppError::io(&self.path, e)),
        };

        let records = read_records(BufReader::new(file), &self.columns, &self.path)?;
        tracing::debug!(kind = %R::KIND, count = records.len(), "read ledger");
        Ok(records)
    }

    /// Validate and add `record` as the new last row.
    /// A rejected record leaves the file untouched.
    pub fn append(&self, record: R) -> Result<(), AppError> {
        let amount = record.amount();
        if amount < Amount::ZERO {
            return Err(AppError::negative_amount(amount));
        }

        // Every row written must decode, or the whole table stops reading.
        let fields = record.to_fields();
        R::from_fields(fields.each_ref().map(String::as_str)).map_err(AppError::unstorable)?;

        let _guard = self.lock();

        let mut records = self.read_all()?;
        records.push(record);
        self.write_atomic(&records)?;

        tracing::info!(
            kind = %R::KIND,
            amount = %amount,
            rows = records.len(),
            "appended ledger record"
        );
        Ok(())
    }

    /// Sum of `field` across every record; zero for an empty ledger.
    pub fn sum(&self, field: SumField) -> Result<Amount, AppError> {
        let records = self.read_all()?;
        checked_total(records.iter().map(|record| field.value_of(record)))
            .ok_or_else(|| AppError::Overflow(format!("{} ledger", R::KIND)))
    }

    pub fn len(&self) -> Result<usize, AppError> {
        Ok(self.read_all()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, AppError> {
        Ok(self.len()? == 0)
    }

    /// The exact bytes of the file, as offered for download.
    pub fn raw_bytes(&self) -> Result<Vec<u8>, AppError> {
        fs::read(&self.path).map_err(|e| AppError::io(&self.path, e))
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ()> {
        // Guards no data, so poisoning is ignored.
        self.write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn temp_path(&self) -> PathBuf {
        let file_name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| R::KIND.export_file_name());
        self.path.with_file_name(format!(".{}.tmp", file_name))
    }

    fn write_atomic(&self, records: &[R]) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| AppError::io(parent, e))?;
        }

        let temp_path = self.temp_path();
        let file = File::create(&temp_path).map_err(|e| AppError::io(&temp_path, e))?;
        let file = write_records(file, &self.columns, records)
            .map_err(|e| AppError::csv(&temp_path, e))?;
        file.sync_all().map_err(|e| AppError::io(&temp_path, e))?;
        drop(file);

        fs::rename(&temp_path, &self.path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            AppError::io(&self.path, e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ExpenseCategory, ExpenseRecord, InvoiceRecord, parse_timestamp};
    use rust_decimal_macros::dec;
    use tempfile::TempDir;

    fn invoice(client: &str, amount: Amount) -> InvoiceRecord {
        let ts = parse_timestamp("2024-02-01 12:00:00").unwrap();
        InvoiceRecord::new(ts, client, "work", amount)
    }

    fn invoice_table(dir: &TempDir) -> LedgerTable<InvoiceRecord> {
        LedgerTable::new(dir.path().join("invoices.csv"), "UGX")
    }

    #[test]
    fn test_ensure_creates_header_only_file() {
        let dir = TempDir::new().unwrap();
        let table = invoice_table(&dir);

        assert!(!table.exists());
        assert!(table.ensure().unwrap());
        assert!(table.exists());

        let contents = fs::read_to_string(table.path()).unwrap();
        assert_eq!(contents, "Date,Client,Description,Amount (UGX)\n");
        assert!(table.read_all().unwrap().is_empty());
    }

    #[test]
    fn test_ensure_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let table = invoice_table(&dir);

        table.ensure().unwrap();
        table.append(invoice("Acme", dec!(100))).unwrap();
        let before = table.raw_bytes().unwrap();

        assert!(!table.ensure().unwrap());
        assert_eq!(table.raw_bytes().unwrap(), before);
        assert_eq!(table.len().unwrap(), 1);
    }

    #[test]
    fn test_ensure_creates_missing_directory() {
        let dir = TempDir::new().unwrap();
        let table: LedgerTable<ExpenseRecord> =
            LedgerTable::new(dir.path().join("nested/data/expenses.csv"), "UGX");

        table.ensure().unwrap();
        assert!(table.exists());
    }

    #[test]
    fn test_append_preserves_order() {
        let dir = TempDir::new().unwrap();
        let table = invoice_table(&dir);
        table.ensure().unwrap();

        for (client, amount) in [("A", dec!(1)), ("B", dec!(2)), ("C", dec!(3))] {
            table.append(invoice(client, amount)).unwrap();
        }

        let clients: Vec<String> = table
            .read_all()
            .unwrap()
            .into_iter()
            .map(|r| r.client)
            .collect();
        assert_eq!(clients, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_append_rejects_negative_amount() {
        let dir = TempDir::new().unwrap();
        let table = invoice_table(&dir);
        table.ensure().unwrap();
        let before = table.raw_bytes().unwrap();

        let err = table.append(invoice("Acme", dec!(-5))).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(table.raw_bytes().unwrap(), before);
        assert!(table.read_all().unwrap().is_empty());
    }

    #[test]
    fn test_append_rejects_blank_custom_category() {
        let dir = TempDir::new().unwrap();
        let table: LedgerTable<ExpenseRecord> =
            LedgerTable::new(dir.path().join("expenses.csv"), "UGX");
        table.ensure().unwrap();
        let ts = parse_timestamp("2024-02-03").unwrap();
        table
            .append(ExpenseRecord::new(ts, ExpenseCategory::Office, "Paper", dec!(10)))
            .unwrap();
        let before = table.raw_bytes().unwrap();

        for name in ["", "   "] {
            let blank = ExpenseCategory::Custom(name.to_string());
            let err = table
                .append(ExpenseRecord::new(ts, blank, "x", dec!(1)))
                .unwrap_err();
            assert!(matches!(err, AppError::InvalidCategory(_)));
        }

        assert_eq!(table.raw_bytes().unwrap(), before);
        assert_eq!(table.read_all().unwrap().len(), 1);
    }

    #[test]
    fn test_append_accepts_zero() {
        let dir = TempDir::new().unwrap();
        let table = invoice_table(&dir);
        table.ensure().unwrap();

        table.append(invoice("Free", dec!(0))).unwrap();
        assert_eq!(table.len().unwrap(), 1);
    }

    #[test]
    fn test_append_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let table = invoice_table(&dir);
        table.ensure().unwrap();
        table.append(invoice("Acme", dec!(10))).unwrap();

        let names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["invoices.csv"]);
    }

    #[test]
    fn test_sum() {
        let dir = TempDir::new().unwrap();
        let table = invoice_table(&dir);
        table.ensure().unwrap();

        assert_eq!(table.sum(SumField::Amount).unwrap(), dec!(0));

        for amount in [dec!(100), dec!(200), dec!(50)] {
            table.append(invoice("Acme", amount)).unwrap();
        }
        assert_eq!(table.sum(SumField::Amount).unwrap(), dec!(350));
    }

    #[test]
    fn test_sum_overflow_is_an_error() {
        let dir = TempDir::new().unwrap();
        let table = invoice_table(&dir);

        table.append(invoice("Acme", Amount::MAX)).unwrap();
        table.append(invoice("Acme", Amount::MAX)).unwrap();

        assert!(matches!(table.sum(SumField::Amount), Err(AppError::Overflow(_))));
    }

    #[test]
    fn test_missing_file_reads_as_empty() {
        let dir = TempDir::new().unwrap();
        let table = invoice_table(&dir);

        assert!(table.read_all().unwrap().is_empty());
        assert_eq!(table.sum(SumField::Amount).unwrap(), dec!(0));
        assert!(table.is_empty().unwrap());
    }

    #[test]
    fn test_raw_bytes_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let table = invoice_table(&dir);
        assert!(matches!(table.raw_bytes(), Err(AppError::Io { .. })));
    }

    #[test]
    fn test_currency_mismatch_is_schema_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("invoices.csv");
        LedgerTable::<InvoiceRecord>::new(&path, "UGX").ensure().unwrap();

        let usd: LedgerTable<InvoiceRecord> = LedgerTable::new(&path, "USD");
        assert!(matches!(usd.read_all(), Err(AppError::Schema { .. })));
        assert!(matches!(
            usd.append(invoice("Acme", dec!(1))),
            Err(AppError::Schema { .. })
        ));
    }

    #[test]
    fn test_expense_table_custom_category() {
        let dir = TempDir::new().unwrap();
        let table: LedgerTable<ExpenseRecord> =
            LedgerTable::new(dir.path().join("expenses.csv"), "UGX");
        table.ensure().unwrap();

        let ts = parse_timestamp("2024-02-03").unwrap();
        let category = ExpenseCategory::Custom("Marketing".to_string());
        table
            .append(ExpenseRecord::new(ts, category.clone(), "Flyers", dec!(40000)))
            .unwrap();

        let records = table.read_all().unwrap();
        assert_eq!(records[0].category, category);
        assert_eq!(table.kind(), LedgerKind::Expenses);
    }
}
