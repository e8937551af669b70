use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

/// Money is represented as a decimal number of currency units.
/// UGX has no minor unit, but nothing here assumes that.
pub type Amount = Decimal;

/// Add up `amounts`, returning `None` if the total leaves the decimal range.
pub fn checked_total(amounts: impl IntoIterator<Item = Amount>) -> Option<Amount> {
    amounts
        .into_iter()
        .try_fold(Amount::ZERO, |total, amount| total.checked_add(amount))
}

/// Format an amount with thousands separators and no fractional digits.
/// Example: 1234567 -> "1,234,567", -1500.6 -> "-1,501"
pub fn format_amount(amount: Amount) -> String {
    let rounded = amount.round();
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let digits = rounded.abs().trunc().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{}{}", sign, grouped)
}

/// Format an amount followed by its currency code.
/// Example: (50000, "UGX") -> "50,000 UGX"
pub fn format_with_currency(amount: Amount, currency: &str) -> String {
    format!("{} {}", format_amount(amount), currency)
}

/// Parse a user-entered amount. Thousands separators and surrounding
/// whitespace are accepted; the sign is kept so validation can reject it.
/// Example: "50,000" -> 50000, "12.5" -> 12.5
pub fn parse_amount(input: &str) -> Result<Amount, ParseAmountError> {
    let cleaned: String = input.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return Err(ParseAmountError::Empty);
    }
    Decimal::from_str(&cleaned).map_err(|_| ParseAmountError::InvalidFormat)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseAmountError {
    Empty,
    InvalidFormat,
}

impl fmt::Display for ParseAmountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseAmountError::Empty => write!(f, "amount is empty"),
            ParseAmountError::InvalidFormat => write!(f, "invalid money format"),
        }
    }
}

impl std::error::Error for ParseAmountError {}
