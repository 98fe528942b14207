//! Field extraction from comma-separated claim exports
//!
//! Exports are simple: no quoting, one claim per file. The first nonblank
//! line holds the headers; later lines whose cell count differs from the
//! header count are dropped. Field values come only from the first kept row,
//! looked up through a table of column-name synonyms.

use std::collections::HashMap;
use tracing::warn;

use super::types::{ExtractedFields, ExtractionDetail, ExtractionResult, ProcessingSummary, ProcessingType};
use crate::error::ExtractionError;

const UTF8_BOM: &str = "\u{feff}";

const CLAIM_NUMBER_COLUMNS: &[&str] = &["claim_no", "claim_number", "claimno", "claim_id"];
const POLICY_NUMBER_COLUMNS: &[&str] = &["policy_no", "policy_number", "policyno", "policy_id"];
const PATIENT_NAME_COLUMNS: &[&str] = &["patient_name", "patient", "name", "member_name"];
const HOSPITAL_NAME_COLUMNS: &[&str] = &["hospital_name", "hospital", "provider_name", "provider"];
const CLAIM_AMOUNT_COLUMNS: &[&str] = &["claim_amount", "amount", "total_amount", "bill_amount"];
const DENIED_AMOUNT_COLUMNS: &[&str] = &["denied_amount", "denial_amount", "rejected_amount"];
const DENIAL_REASON_COLUMNS: &[&str] = &["denial_reason", "reason", "rejection_reason", "remarks"];

/// Parsed table: headers in file order and rows keyed by header
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<HashMap<String, String>>,
    /// Data lines dropped for having the wrong number of cells
    pub dropped_rows: usize,
}

/// Splits a document into headers and well-formed rows
///
/// A row with a repeated header name keeps the value of the later column.
pub fn parse_table(bytes: &[u8]) -> Result<CsvTable, ExtractionError> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| ExtractionError::MalformedDocument(format!("CSV is not valid UTF-8: {}", e)))?;
    let text = text.strip_prefix(UTF8_BOM).unwrap_or(text);

    let mut lines = text.split('\n').filter(|line| !line.trim().is_empty());

    let headers: Vec<String> = match lines.next() {
        Some(header_line) => split_cells(header_line),
        None => return Ok(CsvTable::default()),
    };

    let mut table = CsvTable {
        headers,
        ..Default::default()
    };

    for line in lines {
        let cells = split_cells(line);
        if cells.len() != table.headers.len() {
            table.dropped_rows += 1;
            continue;
        }
        table.rows.push(table.headers.iter().cloned().zip(cells).collect());
    }

    Ok(table)
}

fn split_cells(line: &str) -> Vec<String> {
    line.split(',').map(|cell| cell.trim().to_string()).collect()
}

/// Lowercases and maps spaces and hyphens to underscores
pub fn normalize_header(header: &str) -> String {
    header.to_lowercase().replace([' ', '-'], "_")
}

/// Reads claim fields from the first row of a table
pub fn fields_from_table(table: &CsvTable) -> ExtractedFields {
    let Some(first_row) = table.rows.first() else {
        return ExtractedFields::default();
    };

    let header_map: HashMap<String, &str> = table
        .headers
        .iter()
        .map(|h| (normalize_header(h), h.as_str()))
        .collect();

    let lookup = |columns: &[&str]| -> Option<String> {
        columns.iter().find_map(|column| {
            header_map
                .get(*column)
                .and_then(|original| first_row.get(*original))
                .map(|value| value.trim())
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        })
    };

    ExtractedFields {
        claim_number: lookup(CLAIM_NUMBER_COLUMNS),
        policy_number: lookup(POLICY_NUMBER_COLUMNS),
        patient_name: lookup(PATIENT_NAME_COLUMNS),
        hospital_name: lookup(HOSPITAL_NAME_COLUMNS),
        admission_date: None,
        discharge_date: None,
        claim_amount: lookup(CLAIM_AMOUNT_COLUMNS),
        denied_amount: lookup(DENIED_AMOUNT_COLUMNS),
        denial_reason: lookup(DENIAL_REASON_COLUMNS),
    }
}

/// Builds the extraction result for a CSV document
pub fn extract(bytes: &[u8]) -> Result<ExtractionResult, ExtractionError> {
    let table = parse_table(bytes)?;
    if table.dropped_rows > 0 {
        warn!(dropped = table.dropped_rows, "Dropped CSV rows with mismatched cell count");
    }

    let fields = fields_from_table(&table);

    Ok(ExtractionResult {
        processing_type: ProcessingType::CsvParsed,
        summary: ProcessingSummary::Table {
            total_rows: table.rows.len(),
            total_columns: table.headers.len(),
            columns_available: table.headers.clone(),
            fields_extracted: fields.count(),
        },
        fields,
        detail: ExtractionDetail::Table {
            headers: table.headers,
            rows: table.rows,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // =========================================================================
    // Table parsing
    // =========================================================================

    mod table_tests {
        use super::*;

        #[test]
        fn test_header_and_rows() {
            let table = parse_table(b"claim_no , patient\nCLM-1, Jane Roe\r\n\nCLM-2,John Doe\n").unwrap();
            assert_eq!(table.headers, vec!["claim_no", "patient"]);
            assert_eq!(table.rows.len(), 2);
            assert_eq!(table.rows[0]["patient"], "Jane Roe");
            assert_eq!(table.rows[1]["claim_no"], "CLM-2");
        }

        #[test]
        fn test_malformed_row_dropped() {
            let table = parse_table(b"claim_no,patient,amount\nCLM-1,Jane Roe\nCLM-2,John Doe,10\n").unwrap();
            assert_eq!(table.rows.len(), 1);
            assert_eq!(table.rows[0]["claim_no"], "CLM-2");
            assert_eq!(table.dropped_rows, 1);
        }

        #[test]
        fn test_leading_blank_lines_skipped() {
            let table = parse_table(b"\n  \nclaim_no\nCLM-9\n").unwrap();
            assert_eq!(table.headers, vec!["claim_no"]);
            assert_eq!(table.rows.len(), 1);
        }

        #[test]
        fn test_empty_document() {
            let table = parse_table(b"").unwrap();
            assert!(table.headers.is_empty());
            assert!(table.rows.is_empty());
        }

        #[test]
        fn test_bom_stripped() {
            let table = parse_table("\u{feff}claim_no\nCLM-1\n".as_bytes()).unwrap();
            assert_eq!(table.headers, vec!["claim_no"]);
        }

        #[test]
        fn test_invalid_utf8_is_malformed() {
            let err = parse_table(&[0x63, 0x6c, 0xff, 0xfe]).unwrap_err();
            assert!(matches!(err, ExtractionError::MalformedDocument(_)));
        }

        #[test]
        fn test_duplicate_header_later_column_wins() {
            let table = parse_table(b"reason,reason\nfirst,second\n").unwrap();
            assert_eq!(table.rows[0]["reason"], "second");
        }
    }

    // =========================================================================
    // Field lookup
    // =========================================================================

    mod field_tests {
        use super::*;

        #[test]
        fn test_synonym_columns() {
            let result = extract(b"claim_no,patient,amount\nCLM-100,Jane Roe,15000.50\n").unwrap();
            assert_eq!(result.fields.claim_number.as_deref(), Some("CLM-100"));
            assert_eq!(result.fields.patient_name.as_deref(), Some("Jane Roe"));
            assert_eq!(result.fields.claim_amount.as_deref(), Some("15000.50"));
        }

        #[test]
        fn test_headers_are_normalized() {
            let result = extract(b"Claim Number,Member-Name,Denial Reason\nA-7,Ravi Kumar,Pre-existing condition\n").unwrap();
            assert_eq!(result.fields.claim_number.as_deref(), Some("A-7"));
            assert_eq!(result.fields.patient_name.as_deref(), Some("Ravi Kumar"));
            assert_eq!(result.fields.denial_reason.as_deref(), Some("Pre-existing condition"));
        }

        #[test]
        fn test_empty_cell_falls_through_to_next_synonym() {
            let result = extract(b"claim_no,claim_id\n,CLM-55\n").unwrap();
            assert_eq!(result.fields.claim_number.as_deref(), Some("CLM-55"));
        }

        #[test]
        fn test_only_first_row_is_read() {
            let result = extract(b"claim_no,remarks\nCLM-1,\nCLM-2,duplicate claim\n").unwrap();
            assert_eq!(result.fields.claim_number.as_deref(), Some("CLM-1"));
            assert_eq!(result.fields.denial_reason, None);
        }

        #[test]
        fn test_summary_reported_without_fields() {
            let result = extract(b"foo,bar\n1,2\n3,4\n").unwrap();
            assert!(result.fields.is_empty());
            assert_eq!(
                result.summary,
                ProcessingSummary::Table {
                    total_rows: 2,
                    total_columns: 2,
                    columns_available: vec!["foo".to_string(), "bar".to_string()],
                    fields_extracted: 0,
                }
            );
        }

        #[test]
        fn test_header_only() {
            let result = extract(b"claim_no,patient\n").unwrap();
            assert!(result.fields.is_empty());
            assert_eq!(result.processing_type, ProcessingType::CsvParsed);
        }
    }

    proptest! {
        #[test]
        fn prop_arbitrary_text_never_panics(text in "[a-z0-9, \\n\\r-]{0,300}") {
            let table = parse_table(text.as_bytes()).unwrap();
            for row in &table.rows {
                prop_assert_eq!(row.len() <= table.headers.len(), true);
            }
        }

        #[test]
        fn prop_kept_rows_match_header_width(
            width in 1usize..6,
            rows in prop::collection::vec(1usize..8, 0..10),
        ) {
            let header: Vec<String> = (0..width).map(|i| format!("h{}", i)).collect();
            let mut doc = header.join(",");
            for cells in &rows {
                doc.push('\n');
                doc.push_str(&vec!["x"; *cells].join(","));
            }
            let table = parse_table(doc.as_bytes()).unwrap();
            let expected = rows.iter().filter(|c| **c == width).count();
            prop_assert_eq!(table.rows.len(), expected);
            prop_assert_eq!(table.dropped_rows, rows.len() - expected);
        }
    }
}
