//! Spreadsheet documents
//!
//! Workbooks are not read. The result carries only the byte size and flags
//! the claim for manual processing; no fields are extracted.

use tracing::warn;

use super::types::{ExtractedFields, ExtractionDetail, ExtractionResult, ProcessingSummary, ProcessingType};

/// Status reported for documents that were measured but not parsed
pub const BASIC_INFO_ONLY: &str = "basic_info_only";

/// Builds the structural-only result for a spreadsheet
pub fn extract(bytes: &[u8]) -> ExtractionResult {
    warn!(file_size = bytes.len(), "Spreadsheet content not parsed, manual processing required");

    ExtractionResult {
        processing_type: ProcessingType::SpreadsheetBasic,
        fields: ExtractedFields::default(),
        summary: ProcessingSummary::Binary {
            file_size: bytes.len(),
            processing_status: BASIC_INFO_ONLY.to_string(),
            requires_manual_processing: true,
        },
        detail: ExtractionDetail::Binary {
            file_size: bytes.len(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reports_size_only() {
        let result = extract(&[0u8; 512]);
        assert!(result.fields.is_empty());
        assert!(result.summary.requires_manual_processing());
        assert_eq!(result.detail, ExtractionDetail::Binary { file_size: 512 });
    }
}
