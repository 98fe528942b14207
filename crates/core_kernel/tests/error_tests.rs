//! Tests for core_kernel error types

use core_kernel::error::CoreError;
use core_kernel::MoneyError;

#[test]
fn test_core_error_configuration() {
    let error = CoreError::configuration("Missing database url");

    match &error {
        CoreError::Configuration(msg) => assert_eq!(msg, "Missing database url"),
    }
    assert_eq!(error.to_string(), "Configuration error: Missing database url");
}

#[test]
fn test_money_error_names_the_input() {
    let error = MoneyError::InvalidAmount("abc".to_string());
    assert_eq!(error.to_string(), "Invalid amount: abc");
}
