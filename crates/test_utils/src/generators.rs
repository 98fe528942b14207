//! Property-Based Test Generators
//!
//! Proptest strategies for scopes, names, amounts as they appear in
//! documents, and whole CSV documents with known field values.

use proptest::prelude::*;
use rust_decimal::Decimal;

use core_kernel::TenantId;

/// Strategy for tenant ids
pub fn tenant_strategy() -> impl Strategy<Value = TenantId> {
    "tenant-[a-z0-9]{4,12}".prop_map(|s| TenantId::parse(s).unwrap())
}

/// Strategy for person or organisation names: one to three capitalised words
pub fn name_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec("[A-Z][a-z]{1,10}", 1..=3).prop_map(|words| words.join(" "))
}

/// Strategy for claim numbers in the shapes payers print them
pub fn claim_number_strategy() -> impl Strategy<Value = String> {
    ("[A-Z]{2,4}", 2000u32..2030, 1u32..99999, prop_oneof![Just('-'), Just('/')])
        .prop_map(|(prefix, year, seq, sep)| format!("{}{}{}{}{:05}", prefix, sep, year, sep, seq))
}

/// Strategy for amounts in paise, up to one crore rupees
pub fn amount_minor_strategy() -> impl Strategy<Value = i64> {
    0i64..1_000_000_000i64
}

/// Formats an amount with thousands separators and an optional currency marker
pub fn format_amount(amount: Decimal, marker: &str) -> String {
    let text = format!("{:.2}", amount);
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    format!("{}{}.{}", marker, grouped, fraction)
}

/// Strategy for `(value, text)` pairs where `text` is how a document prints `value`
pub fn amount_text_strategy() -> impl Strategy<Value = (Decimal, String)> {
    (
        amount_minor_strategy(),
        prop_oneof![Just(""), Just("Rs. "), Just("Rs."), Just("₹"), Just("₹ ")],
        any::<bool>(),
    )
        .prop_map(|(minor, marker, grouped)| {
            let value = Decimal::new(minor, 2);
            let text = if grouped {
                format_amount(value, marker)
            } else {
                format!("{}{:.2}", marker, value)
            };
            (value, text)
        })
}

/// Values written into a generated CSV document
#[derive(Debug, Clone)]
pub struct CsvDenial {
    pub claim_number: String,
    pub patient_name: String,
    pub payer_name: String,
    pub denied_amount: Decimal,
    pub document: String,
}

/// Strategy for single-row CSV documents using any accepted header synonym
pub fn csv_denial_strategy() -> impl Strategy<Value = CsvDenial> {
    (
        claim_number_strategy(),
        name_strategy(),
        name_strategy(),
        amount_minor_strategy(),
        prop::sample::select(vec!["claim_no", "Claim Number", "claimno", "claim-id"]),
        prop::sample::select(vec!["patient_name", "Patient", "name", "Member Name"]),
        prop::sample::select(vec!["hospital_name", "Hospital", "provider_name", "Provider"]),
        prop::sample::select(vec!["denied_amount", "Denial Amount", "rejected_amount"]),
    )
        .prop_map(
            |(claim_number, patient_name, payer_name, minor, claim_col, patient_col, payer_col, denied_col)| {
                let denied_amount = Decimal::new(minor, 2);
                let document = format!(
                    "{},{},{},{},reason\n{},{},{},{:.2},Not covered\n",
                    claim_col, patient_col, payer_col, denied_col, claim_number, patient_name, payer_name, denied_amount
                );
                CsvDenial {
                    claim_number,
                    patient_name,
                    payer_name,
                    denied_amount,
                    document,
                }
            },
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_format_amount_groups_thousands() {
        assert_eq!(format_amount(dec!(1234567.5), "Rs. "), "Rs. 1,234,567.50");
        assert_eq!(format_amount(dec!(999), ""), "999.00");
        assert_eq!(format_amount(dec!(0), "₹"), "₹0.00");
    }

    proptest! {
        #[test]
        fn test_generated_names_are_nonblank(name in name_strategy()) {
            prop_assert!(!name.trim().is_empty());
        }

        #[test]
        fn test_generated_csv_has_two_lines(denial in csv_denial_strategy()) {
            prop_assert_eq!(denial.document.lines().count(), 2);
        }
    }
}
