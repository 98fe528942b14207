//! Extraction result types

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use domain_claims::ClaimFields;

/// Candidate claim fields read from a document
///
/// Every field is optional; a field the document did not yield is `None`.
/// Values are kept as the text that was captured, amounts included, so that
/// parse failures surface where the value is used.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub claim_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hospital_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admission_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discharge_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub claim_amount: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub denied_amount: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub denial_reason: Option<String>,
}

impl ExtractedFields {
    /// Number of fields that were found
    pub fn count(&self) -> usize {
        [
            &self.claim_number,
            &self.policy_number,
            &self.patient_name,
            &self.hospital_name,
            &self.admission_date,
            &self.discharge_date,
            &self.claim_amount,
            &self.denied_amount,
            &self.denial_reason,
        ]
        .iter()
        .filter(|field| field.is_some())
        .count()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// The subset written onto the claim record
    pub fn claim_fields(&self) -> ClaimFields<'_> {
        ClaimFields {
            claim_number: self.claim_number.as_deref(),
            claim_amount: self.claim_amount.as_deref(),
        }
    }
}

/// Bounding box of a detected line, as fractions of the page size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

/// One line of text returned by the text detector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextLine {
    pub text: String,
    /// Detector confidence, 0-100
    pub confidence: f32,
    pub geometry: Option<BoundingBox>,
}

impl TextLine {
    pub fn new(text: impl Into<String>, confidence: f32) -> Self {
        Self {
            text: text.into(),
            confidence,
            geometry: None,
        }
    }
}

/// Which extraction path handled the document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingType {
    PdfTextDetection,
    CsvParsed,
    SpreadsheetBasic,
}

impl ProcessingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessingType::PdfTextDetection => "pdf_text_detection",
            ProcessingType::CsvParsed => "csv_parsed",
            ProcessingType::SpreadsheetBasic => "spreadsheet_basic",
        }
    }
}

impl fmt::Display for ProcessingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structural metadata reported with every extraction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProcessingSummary {
    Text {
        total_blocks: usize,
        total_characters: usize,
        fields_extracted: usize,
    },
    Table {
        total_rows: usize,
        total_columns: usize,
        columns_available: Vec<String>,
        fields_extracted: usize,
    },
    Binary {
        file_size: usize,
        processing_status: String,
        requires_manual_processing: bool,
    },
}

impl ProcessingSummary {
    /// True when the document was only measured, not read
    pub fn requires_manual_processing(&self) -> bool {
        matches!(
            self,
            ProcessingSummary::Binary {
                requires_manual_processing: true,
                ..
            }
        )
    }
}

/// Raw material the fields were read from, kept for auditability
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractionDetail {
    Text {
        lines: Vec<TextLine>,
        full_text: String,
    },
    Table {
        headers: Vec<String>,
        rows: Vec<HashMap<String, String>>,
    },
    Binary {
        file_size: usize,
    },
}

/// Output of the field extractor
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionResult {
    pub processing_type: ProcessingType,
    pub fields: ExtractedFields,
    pub summary: ProcessingSummary,
    pub detail: ExtractionDetail,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_only_present_fields() {
        let fields = ExtractedFields {
            claim_number: Some("CLM-1".to_string()),
            denial_reason: Some("duplicate".to_string()),
            ..Default::default()
        };
        assert_eq!(fields.count(), 2);
        assert!(ExtractedFields::default().is_empty());
    }

    #[test]
    fn test_absent_fields_are_not_serialized() {
        let fields = ExtractedFields {
            patient_name: Some("Jane Roe".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_value(&fields).unwrap();
        assert_eq!(json, serde_json::json!({"patient_name": "Jane Roe"}));
    }

    #[test]
    fn test_summary_serializes_flat() {
        let summary = ProcessingSummary::Binary {
            file_size: 2048,
            processing_status: "basic_info_only".to_string(),
            requires_manual_processing: true,
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["file_size"], 2048);
        assert_eq!(json["requires_manual_processing"], true);
        assert!(summary.requires_manual_processing());
    }

    #[test]
    fn test_processing_type_names() {
        let json = serde_json::to_string(&ProcessingType::PdfTextDetection).unwrap();
        assert_eq!(json, "\"pdf_text_detection\"");
        assert_eq!(ProcessingType::CsvParsed.to_string(), "csv_parsed");
    }
}
