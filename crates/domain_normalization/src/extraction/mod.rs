//! Field Extractor
//!
//! Turns uploaded document bytes into candidate claim fields. The declared
//! content type picks the path:
//!
//! | Content type | Path |
//! |--------------|------|
//! | `application/pdf` | text detection, then field patterns ([`pdf`]) |
//! | `text/csv` | header/row split, synonym lookup ([`csv`]) |
//! | Excel / OOXML spreadsheet | size only, manual processing ([`spreadsheet`]) |
//!
//! Anything else fails with [`ExtractionError::UnsupportedContentType`].

pub mod content_type;
pub mod csv;
pub mod pdf;
pub mod spreadsheet;
pub mod types;

use std::sync::Arc;
use tracing::{debug, instrument};

pub use content_type::DocumentKind;
pub use types::{
    BoundingBox, ExtractedFields, ExtractionDetail, ExtractionResult, ProcessingSummary, ProcessingType, TextLine,
};

use crate::error::ExtractionError;
use crate::ports::TextDetector;

/// Dispatches documents to the matching extraction path
#[derive(Clone)]
pub struct FieldExtractor {
    detector: Arc<dyn TextDetector>,
}

impl FieldExtractor {
    pub fn new(detector: Arc<dyn TextDetector>) -> Self {
        Self { detector }
    }

    /// Extracts candidate fields from a document
    ///
    /// # Arguments
    ///
    /// * `content_type` - Declared MIME type, parameters allowed
    /// * `document` - Raw document bytes
    #[instrument(skip(self, document), fields(size = document.len()))]
    pub async fn extract(&self, content_type: &str, document: &[u8]) -> Result<ExtractionResult, ExtractionError> {
        let kind = DocumentKind::from_content_type(content_type)
            .ok_or_else(|| ExtractionError::UnsupportedContentType(content_type.trim().to_string()))?;

        let result = match kind {
            DocumentKind::Pdf => {
                let lines = self
                    .detector
                    .detect_lines(document)
                    .await
                    .map_err(ExtractionError::TextDetection)?;
                pdf::extract_from_lines(lines)
            }
            DocumentKind::Csv => csv::extract(document)?,
            DocumentKind::Spreadsheet => spreadsheet::extract(document),
        };

        debug!(
            kind = %kind,
            fields_extracted = result.fields.count(),
            "Document extracted"
        );
        Ok(result)
    }
}
