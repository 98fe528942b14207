//! Field extraction from detected document text
//!
//! The text detector returns one record per line. Lines are joined with a
//! newline each and the joined text is lowercased before the field patterns
//! run, so captured values come back lowercased.
//!
//! Each field has exactly one pattern and keeps its first match. The pattern
//! set is a fixed contract: name captures run on across line breaks until a
//! character outside their class (a digit, a colon) stops them, and amounts
//! tolerate an `rs.`/`₹` marker and comma separators.

use regex::Regex;
use std::sync::LazyLock;

use super::types::{ExtractedFields, ExtractionDetail, ExtractionResult, ProcessingSummary, ProcessingType, TextLine};

static CLAIM_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)claim\s*(?:no|number|#)[\s:]*([A-Z0-9\-/]+)").expect("valid regex")
});
static POLICY_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)policy\s*(?:no|number|#)[\s:]*([A-Z0-9\-/]+)").expect("valid regex")
});
static PATIENT_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)patient\s*name[\s:]*([A-Za-z\s]+)").expect("valid regex"));
static HOSPITAL_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)hospital\s*name[\s:]*([A-Za-z\s&.]+)").expect("valid regex"));
static ADMISSION_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)admission\s*date[\s:]*(\d{1,2}[/-]\d{1,2}[/-]\d{2,4})").expect("valid regex")
});
static DISCHARGE_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)discharge\s*date[\s:]*(\d{1,2}[/-]\d{1,2}[/-]\d{2,4})").expect("valid regex")
});
static CLAIM_AMOUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)claim\s*amount[\s:]*(?:rs\.?|₹)?\s*([0-9,]+(?:\.\d{2})?)").expect("valid regex")
});
static DENIED_AMOUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)denied\s*amount[\s:]*(?:rs\.?|₹)?\s*([0-9,]+(?:\.\d{2})?)").expect("valid regex")
});
static DENIAL_REASON: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)denial\s*reason[\s:]*([A-Za-z\s,.-]+)").expect("valid regex"));

fn first_capture(pattern: &Regex, text: &str) -> Option<String> {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Runs the field patterns over document text
pub fn parse_claim_text(text: &str) -> ExtractedFields {
    let lower = text.to_lowercase();

    ExtractedFields {
        claim_number: first_capture(&CLAIM_NUMBER, &lower),
        policy_number: first_capture(&POLICY_NUMBER, &lower),
        patient_name: first_capture(&PATIENT_NAME, &lower),
        hospital_name: first_capture(&HOSPITAL_NAME, &lower),
        admission_date: first_capture(&ADMISSION_DATE, &lower),
        discharge_date: first_capture(&DISCHARGE_DATE, &lower),
        claim_amount: first_capture(&CLAIM_AMOUNT, &lower),
        denied_amount: first_capture(&DENIED_AMOUNT, &lower),
        denial_reason: first_capture(&DENIAL_REASON, &lower),
    }
}

/// Joins detected lines in order, one newline after each
pub fn join_lines(lines: &[TextLine]) -> String {
    let mut text = String::with_capacity(lines.iter().map(|l| l.text.len() + 1).sum());
    for line in lines {
        text.push_str(&line.text);
        text.push('\n');
    }
    text
}

/// Builds the extraction result for a text-detected document
pub fn extract_from_lines(lines: Vec<TextLine>) -> ExtractionResult {
    let full_text = join_lines(&lines);
    let fields = parse_claim_text(&full_text);

    ExtractionResult {
        processing_type: ProcessingType::PdfTextDetection,
        summary: ProcessingSummary::Text {
            total_blocks: lines.len(),
            total_characters: full_text.chars().count(),
            fields_extracted: fields.count(),
        },
        fields,
        detail: ExtractionDetail::Text { lines, full_text },
    }
}
