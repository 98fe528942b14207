//! Amounts read from document text

use rust_decimal::Decimal;
use tracing::warn;

use core_kernel::{parse_optional_amount, ClaimId};

/// Parses an extracted amount, storing zero when the text is unreadable
///
/// A missing amount is zero without a warning.
pub(crate) fn amount_or_zero(claim_id: ClaimId, field: &'static str, raw: Option<&str>) -> Decimal {
    parse_optional_amount(raw).unwrap_or_else(|e| {
        warn!(claim_id = %claim_id, field, error = %e, "Amount unreadable, using zero");
        Decimal::ZERO
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_readable_amount() {
        assert_eq!(amount_or_zero(ClaimId::new(), "claim_amount", Some("Rs. 2,500.75")), dec!(2500.75));
    }

    #[test]
    fn test_missing_and_unreadable_are_zero() {
        let claim_id = ClaimId::new();
        assert_eq!(amount_or_zero(claim_id, "denied_amount", None), Decimal::ZERO);
        assert_eq!(amount_or_zero(claim_id, "denied_amount", Some("n/a")), Decimal::ZERO);
        assert_eq!(amount_or_zero(claim_id, "denied_amount", Some("-10")), Decimal::ZERO);
    }
}
