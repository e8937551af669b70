use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::record::{COLUMN_COUNT, format_timestamp, parse_stored_amount, parse_timestamp};
use super::{Amount, LedgerKind, LedgerRecord, RowError};

/// What an expense was spent on. The fixed set covers the usual cases;
/// anything else is kept verbatim as a custom category.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum ExpenseCategory {
    Office,
    Transport,
    Supplies,
    Other,
    Custom(String),
}

impl ExpenseCategory {
    /// The categories offered by default, in display order.
    pub const STANDARD: [ExpenseCategory; 4] = [
        ExpenseCategory::Office,
        ExpenseCategory::Transport,
        ExpenseCategory::Supplies,
        ExpenseCategory::Other,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            ExpenseCategory::Office => "Office",
            ExpenseCategory::Transport => "Transport",
            ExpenseCategory::Supplies => "Supplies",
            ExpenseCategory::Other => "Other",
            ExpenseCategory::Custom(name) => name,
        }
    }

    /// Returns None only for blank input.
    pub fn from_str(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }
        Some(match s.to_lowercase().as_str() {
            "office" => ExpenseCategory::Office,
            "transport" => ExpenseCategory::Transport,
            "supplies" => ExpenseCategory::Supplies,
            "other" => ExpenseCategory::Other,
            _ => ExpenseCategory::Custom(s.to_string()),
        })
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, ExpenseCategory::Custom(_))
    }
}

impl std::fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<ExpenseCategory> for String {
    fn from(category: ExpenseCategory) -> Self {
        category.as_str().to_string()
    }
}

impl TryFrom<String> for ExpenseCategory {
    type Error = RowError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ExpenseCategory::from_str(&value).ok_or(RowError::InvalidCategory(value))
    }
}

/// Money spent by the business. Expenses are immutable once recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    pub timestamp: NaiveDateTime,
    pub category: ExpenseCategory,
    pub description: String,
    pub amount: Amount,
}

impl ExpenseRecord {
    pub fn new(
        timestamp: NaiveDateTime,
        category: ExpenseCategory,
        description: impl Into<String>,
        amount: Amount,
    ) -> Self {
        Self {
            timestamp,
            category,
            description: description.into(),
            amount,
        }
    }
}

impl LedgerRecord for ExpenseRecord {
    const KIND: LedgerKind = LedgerKind::Expenses;

    fn amount(&self) -> Amount {
        self.amount
    }

    fn to_fields(&self) -> [String; COLUMN_COUNT] {
        [
            format_timestamp(&self.timestamp),
            self.category.to_string(),
            self.description.clone(),
            self.amount.to_string(),
        ]
    }

    fn from_fields(fields: [&str; COLUMN_COUNT]) -> Result<Self, RowError> {
        let [date, category, description, amount] = fields;
        Ok(Self {
            timestamp: parse_timestamp(date)?,
            category: ExpenseCategory::from_str(category)
                .ok_or_else(|| RowError::InvalidCategory(category.to_string()))?,
            description: description.to_string(),
            amount: parse_stored_amount(amount)?,
        })
    }
}

/// Request to log a new expense, as entered by the user.
#[derive(Debug, Clone)]
pub struct NewExpense {
    pub category: ExpenseCategory,
    pub description: String,
    pub amount: Amount,
    pub timestamp: Option<NaiveDateTime>,
}

impl NewExpense {
    pub fn new(category: ExpenseCategory, amount: Amount) -> Self {
        Self {
            category,
            description: String::new(),
            amount,
            timestamp: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_timestamp(mut self, timestamp: NaiveDateTime) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_category_parsing() {
        assert_eq!(ExpenseCategory::from_str("office"), Some(ExpenseCategory::Office));
        assert_eq!(ExpenseCategory::from_str("TRANSPORT"), Some(ExpenseCategory::Transport));
        assert_eq!(ExpenseCategory::from_str(" Supplies "), Some(ExpenseCategory::Supplies));
        assert_eq!(ExpenseCategory::from_str("Other"), Some(ExpenseCategory::Other));
        assert_eq!(
            ExpenseCategory::from_str("Marketing"),
            Some(ExpenseCategory::Custom("Marketing".to_string()))
        );
        assert_eq!(ExpenseCategory::from_str("  "), None);
    }

    #[test]
    fn test_category_display_round_trip() {
        for category in ExpenseCategory::STANDARD {
            assert!(!category.is_custom());
            assert_eq!(ExpenseCategory::from_str(&category.to_string()), Some(category));
        }
    }

    #[test]
    fn test_category_serde() {
        let json = serde_json::to_string(&ExpenseCategory::Transport).unwrap();
        assert_eq!(json, "\"Transport\"");

        let custom: ExpenseCategory = serde_json::from_str("\"Rent\"").unwrap();
        assert_eq!(custom, ExpenseCategory::Custom("Rent".to_string()));

        assert!(serde_json::from_str::<ExpenseCategory>("\"\"").is_err());
    }

    #[test]
    fn test_fields_round_trip() {
        let ts = parse_timestamp("2024-06-02 18:00:00").unwrap();
        let expense = ExpenseRecord::new(ts, ExpenseCategory::Transport, "Boda to site", dec!(5000));

        let fields = expense.to_fields();
        assert_eq!(fields[1], "Transport");

        let refs = [
            fields[0].as_str(),
            fields[1].as_str(),
            fields[2].as_str(),
            fields[3].as_str(),
        ];
        assert_eq!(ExpenseRecord::from_fields(refs).unwrap(), expense);
    }

    #[test]
    fn test_from_fields_blank_category() {
        let result = ExpenseRecord::from_fields(["2024-06-02", "", "Fuel", "100"]);
        assert_eq!(result, Err(RowError::InvalidCategory(String::new())));
    }
}
