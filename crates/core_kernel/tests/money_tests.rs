//! Unit tests for amount parsing

use core_kernel::{parse_optional_amount, try_parse_amount, MoneyError};
use rust_decimal_macros::dec;

mod parsing {
    use super::*;

    #[test]
    fn test_rupee_amount_with_separators() {
        assert_eq!(try_parse_amount("₹ 12,345.00"), Ok(dec!(12345.00)));
    }

    #[test]
    fn test_rs_prefix() {
        assert_eq!(try_parse_amount("Rs.2,500"), Ok(dec!(2500)));
        assert_eq!(try_parse_amount("Rs. 2,500.75"), Ok(dec!(2500.75)));
    }

    #[test]
    fn test_surrounding_whitespace() {
        assert_eq!(try_parse_amount("  15000.50 "), Ok(dec!(15000.50)));
    }

    #[test]
    fn test_indian_grouping() {
        assert_eq!(try_parse_amount("1,23,456.78"), Ok(dec!(123456.78)));
    }
}

mod failures {
    use super::*;

    #[test]
    fn test_empty_reports_empty() {
        assert_eq!(try_parse_amount(""), Err(MoneyError::Empty));
        assert_eq!(try_parse_amount("₹"), Err(MoneyError::Empty));
    }

    #[test]
    fn test_invalid_reports_original_text() {
        match try_parse_amount("12.3.4") {
            Err(MoneyError::InvalidAmount(raw)) => assert_eq!(raw, "12.3.4"),
            other => panic!("Expected InvalidAmount, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_amount_is_zero() {
        assert_eq!(parse_optional_amount(None), Ok(dec!(0)));
        assert_eq!(parse_optional_amount(Some("750")), Ok(dec!(750)));
    }

    #[test]
    fn test_present_but_unreadable_is_an_error() {
        assert!(parse_optional_amount(Some("n/a")).is_err());
    }
}
