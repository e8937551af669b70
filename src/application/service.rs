use chrono::{Local, NaiveDateTime, SubsecRound};

use crate::config::Config;
use crate::domain::{
    Amount, ExpenseCategory, ExpenseRecord, InvoiceRecord, LedgerKind, NewExpense, NewInvoice,
    SumField, checked_total,
};
use crate::storage::LedgerStore;

use super::{AppError, CategoryReport, SummaryReport};

/// Application service providing high-level operations on the ledgers.
/// This is the primary interface for any front end (CLI, web form, etc.).
pub struct LedgerService {
    store: LedgerStore,
}

impl LedgerService {
    /// Create a service over an existing store without touching disk.
    pub fn new(store: LedgerStore) -> Self {
        Self { store }
    }

    /// Open the ledgers described by `config`, creating any missing table.
    pub fn init(config: &Config) -> Result<Self, AppError> {
        let service = Self::new(LedgerStore::new(config));
        service.store.ensure_all()?;
        tracing::debug!(
            invoices = %config.invoice_path().display(),
            expenses = %config.expense_path().display(),
            "ledgers ready"
        );
        Ok(service)
    }

    pub fn store(&self) -> &LedgerStore {
        &self.store
    }

    pub fn currency(&self) -> &str {
        self.store.currency()
    }

    // ========================
    // Recording
    // ========================

    /// Record a new invoice. The client name is required.
    pub fn record_invoice(&self, request: NewInvoice) -> Result<InvoiceRecord, AppError> {
        let client = request.client.trim();
        if client.is_empty() {
            return Err(AppError::Validation("client name must not be empty".into()));
        }
        validate_amount(request.amount)?;

        let record = InvoiceRecord::new(
            stamp(request.timestamp),
            client,
            request.description.trim(),
            request.amount,
        );
        self.store.invoices().append(record.clone())?;
        Ok(record)
    }

    /// Log a new expense. The category is stored in its canonical form, so
    /// `Custom("office")` is saved as `Office`.
    pub fn record_expense(&self, request: NewExpense) -> Result<ExpenseRecord, AppError> {
        let category = ExpenseCategory::from_str(request.category.as_str())
            .ok_or_else(|| AppError::InvalidCategory(request.category.to_string()))?;
        validate_amount(request.amount)?;

        let record = ExpenseRecord::new(
            stamp(request.timestamp),
            category,
            request.description.trim(),
            request.amount,
        );
        self.store.expenses().append(record.clone())?;
        Ok(record)
    }

    // ========================
    // Queries
    // ========================

    pub fn list_invoices(&self) -> Result<Vec<InvoiceRecord>, AppError> {
        self.store.invoices().read_all()
    }

    pub fn list_expenses(&self) -> Result<Vec<ExpenseRecord>, AppError> {
        self.store.expenses().read_all()
    }

    pub fn total_income(&self) -> Result<Amount, AppError> {
        self.store.sum(LedgerKind::Invoices, SumField::Amount)
    }

    pub fn total_expenses(&self) -> Result<Amount, AppError> {
        self.store.sum(LedgerKind::Expenses, SumField::Amount)
    }

    /// Totals and net profit across both ledgers.
    pub fn summary(&self) -> Result<SummaryReport, AppError> {
        let invoices = self.list_invoices()?;
        let expenses = self.list_expenses()?;

        let total_income = checked_total(invoices.iter().map(|i| i.amount))
            .ok_or_else(|| AppError::Overflow("invoices ledger".into()))?;
        let total_expenses = checked_total(expenses.iter().map(|e| e.amount))
            .ok_or_else(|| AppError::Overflow("expenses ledger".into()))?;
        let net_profit = total_income
            .checked_sub(total_expenses)
            .ok_or_else(|| AppError::Overflow("net profit".into()))?;

        Ok(SummaryReport {
            currency: self.currency().to_string(),
            total_income,
            total_expenses,
            net_profit,
            invoice_count: invoices.len(),
            expense_count: expenses.len(),
        })
    }

    /// Expense totals per category.
    pub fn expense_breakdown(&self) -> Result<CategoryReport, AppError> {
        let expenses = self.list_expenses()?;
        CategoryReport::from_expenses(self.currency(), &expenses)
    }

    // ========================
    // Export
    // ========================

    /// Raw bytes of a ledger file, exactly as stored.
    pub fn export_bytes(&self, kind: LedgerKind) -> Result<Vec<u8>, AppError> {
        self.store.raw_bytes(kind)
    }

    pub fn export_file_name(&self, kind: LedgerKind) -> String {
        kind.export_file_name()
    }
}

fn validate_amount(amount: Amount) -> Result<(), AppError> {
    if amount < Amount::ZERO {
        return Err(AppError::negative_amount(amount));
    }
    Ok(())
}

/// Timestamps are stored to the microsecond; anything finer is dropped here
/// so the returned record equals the one read back.
fn stamp(timestamp: Option<NaiveDateTime>) -> NaiveDateTime {
    timestamp
        .unwrap_or_else(|| Local::now().naive_local())
        .trunc_subsecs(6)
}
