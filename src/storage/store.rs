use crate::application::AppError;
use crate::config::Config;
use crate::domain::{Amount, ExpenseRecord, InvoiceRecord, LedgerKind, SumField};

use super::LedgerTable;

/// The pair of ledgers this system keeps, built from explicit configuration.
pub struct LedgerStore {
    invoices: LedgerTable<InvoiceRecord>,
    expenses: LedgerTable<ExpenseRecord>,
    currency: String,
}

impl LedgerStore {
    pub fn new(config: &Config) -> Self {
        let currency = config.currency().to_string();
        Self {
            invoices: LedgerTable::new(config.invoice_path(), &currency),
            expenses: LedgerTable::new(config.expense_path(), &currency),
            currency,
        }
    }

    /// Make sure both tables exist with their header rows.
    pub fn ensure_all(&self) -> Result<(), AppError> {
        self.invoices.ensure()?;
        self.expenses.ensure()?;
        Ok(())
    }

    pub fn invoices(&self) -> &LedgerTable<InvoiceRecord> {
        &self.invoices
    }

    pub fn expenses(&self) -> &LedgerTable<ExpenseRecord> {
        &self.expenses
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn ensure(&self, kind: LedgerKind) -> Result<bool, AppError> {
        match kind {
            LedgerKind::Invoices => self.invoices.ensure(),
            LedgerKind::Expenses => self.expenses.ensure(),
        }
    }

    pub fn sum(&self, kind: LedgerKind, field: SumField) -> Result<Amount, AppError> {
        match kind {
            LedgerKind::Invoices => self.invoices.sum(field),
            LedgerKind::Expenses => self.expenses.sum(field),
        }
    }

    pub fn raw_bytes(&self, kind: LedgerKind) -> Result<Vec<u8>, AppError> {
        match kind {
            LedgerKind::Invoices => self.invoices.raw_bytes(),
            LedgerKind::Expenses => self.expenses.raw_bytes(),
        }
    }

    pub fn columns(&self, kind: LedgerKind) -> &[String; crate::domain::COLUMN_COUNT] {
        match kind {
            LedgerKind::Invoices => self.invoices.columns(),
            LedgerKind::Expenses => self.expenses.columns(),
        }
    }
}
