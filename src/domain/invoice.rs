use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::record::{COLUMN_COUNT, format_timestamp, parse_stored_amount, parse_timestamp};
use super::{Amount, LedgerKind, LedgerRecord, RowError};

/// Money billed to a client. Invoices are immutable once recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceRecord {
    /// Local wall-clock time the invoice was recorded
    pub timestamp: NaiveDateTime,
    pub client: String,
    pub description: String,
    /// Amount in currency units (never negative)
    pub amount: Amount,
}

impl InvoiceRecord {
    pub fn new(
        timestamp: NaiveDateTime,
        client: impl Into<String>,
        description: impl Into<String>,
        amount: Amount,
    ) -> Self {
        Self {
            timestamp,
            client: client.into(),
            description: description.into(),
            amount,
        }
    }
}

impl LedgerRecord for InvoiceRecord {
    const KIND: LedgerKind = LedgerKind::Invoices;

    fn amount(&self) -> Amount {
        self.amount
    }

    fn to_fields(&self) -> [String; COLUMN_COUNT] {
        [
            format_timestamp(&self.timestamp),
            self.client.clone(),
            self.description.clone(),
            self.amount.to_string(),
        ]
    }

    fn from_fields(fields: [&str; COLUMN_COUNT]) -> Result<Self, RowError> {
        let [date, client, description, amount] = fields;
        Ok(Self {
            timestamp: parse_timestamp(date)?,
            client: client.to_string(),
            description: description.to_string(),
            amount: parse_stored_amount(amount)?,
        })
    }
}

/// Request to record a new invoice, as entered by the user.
#[derive(Debug, Clone, Default)]
pub struct NewInvoice {
    pub client: String,
    pub description: String,
    pub amount: Amount,
    /// Defaults to the current local time when absent
    pub timestamp: Option<NaiveDateTime>,
}

impl NewInvoice {
    pub fn new(client: impl Into<String>, amount: Amount) -> Self {
        Self {
            client: client.into(),
            amount,
            ..Default::default()
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
