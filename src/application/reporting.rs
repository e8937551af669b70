use serde::{Deserialize, Serialize};

use crate::domain::{Amount, ExpenseRecord, checked_total};

use super::AppError;

/// Headline figures: what came in, what went out, and what is left.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryReport {
    pub currency: String,
    pub total_income: Amount,
    pub total_expenses: Amount,
    /// Income minus expenses; negative when running at a loss
    pub net_profit: Amount,
    pub invoice_count: usize,
    pub expense_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryReport {
    pub currency: String,
    pub categories: Vec<CategorySummary>,
    pub total: Amount,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub category: String,
    pub total: Amount,
    pub count: usize,
    pub percentage: f64,
}

impl CategoryReport {
    /// Group expenses by category, largest total first. Ties keep the order
    /// in which categories first appear in the ledger.
    pub fn from_expenses(
        currency: impl Into<String>,
        expenses: &[ExpenseRecord],
    ) -> Result<Self, AppError> {
        let mut categories: Vec<CategorySummary> = Vec::new();

        for expense in expenses {
            let name = expense.category.as_str();
            match categories.iter_mut().find(|c| c.category == name) {
                Some(summary) => {
                    summary.total = summary
                        .total
                        .checked_add(expense.amount)
                        .ok_or_else(|| AppError::Overflow(format!("{} expenses", name)))?;
                    summary.count += 1;
                }
                None => categories.push(CategorySummary {
                    category: name.to_string(),
                    total: expense.amount,
                    count: 1,
                    percentage: 0.0,
                }),
            }
        }

        let total = checked_total(categories.iter().map(|c| c.total))
            .ok_or_else(|| AppError::Overflow("expenses ledger".into()))?;
        for summary in &mut categories {
            summary.percentage = percentage_of(summary.total, total);
        }
        categories.sort_by(|a, b| b.total.cmp(&a.total));

        Ok(Self {
            currency: currency.into(),
            categories,
            total,
        })
    }
}

fn percentage_of(part: Amount, whole: Amount) -> f64 {
    use rust_decimal::prelude::ToPrimitive;

    if whole.is_zero() {
        return 0.0;
    }
    (part / whole * Amount::ONE_HUNDRED).to_f64().unwrap_or(0.0)
}
