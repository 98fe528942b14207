//! Monetary amounts read from claim documents
//!
//! Amounts arrive as free text ("₹ 12,345.00", "Rs.500", "15000.50") and are
//! stored as nonnegative `rust_decimal::Decimal` values with two decimal
//! places. Parsing reports why a value could not be read; the pipeline logs
//! that and stores zero instead of failing the claim.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::str::FromStr;
use thiserror::Error;

/// Currency markers removed before parsing
pub const CURRENCY_MARKERS: [&str; 2] = ["₹", "Rs."];

/// Decimal places kept on parsed amounts
pub const AMOUNT_SCALE: u32 = 2;

/// Errors that can occur while reading an amount
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Empty amount")]
    Empty,

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Negative amount: {0}")]
    Negative(String),
}

/// Parses an amount, reporting why it could not be read
///
/// Thousands separators and currency markers are stripped first, then the
/// remainder is trimmed and parsed as a decimal.
///
/// # Example
///
/// ```rust
/// use core_kernel::try_parse_amount;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(try_parse_amount("₹ 12,345.00").unwrap(), dec!(12345.00));
/// assert!(try_parse_amount("not-a-number").is_err());
/// ```
pub fn try_parse_amount(raw: &str) -> Result<Decimal, MoneyError> {
    let mut cleaned = raw.replace(',', "");
    for marker in CURRENCY_MARKERS {
        cleaned = cleaned.replace(marker, "");
    }
    let cleaned = cleaned.trim();

    if cleaned.is_empty() {
        return Err(MoneyError::Empty);
    }

    let amount = Decimal::from_str(cleaned)
        .map_err(|_| MoneyError::InvalidAmount(raw.to_string()))?;

    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(MoneyError::Negative(raw.to_string()));
    }

    Ok(amount.round_dp(AMOUNT_SCALE))
}

/// Parses an optional amount; a missing value is zero
///
/// Callers that must not fail substitute zero for the error themselves, after
/// logging it.
pub fn parse_optional_amount(raw: Option<&str>) -> Result<Decimal, MoneyError> {
    raw.map_or(Ok(dec!(0)), try_parse_amount)
}
