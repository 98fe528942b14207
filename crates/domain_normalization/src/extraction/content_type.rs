//! Content type dispatch

use std::fmt;

const PDF: &str = "application/pdf";
const CSV: &str = "text/csv";
const SPREADSHEET_TYPES: [&str; 2] = [
    "application/vnd.ms-excel",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
];

/// Document formats the extractor can handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    Pdf,
    Csv,
    Spreadsheet,
}

impl DocumentKind {
    /// Classifies a declared MIME type
    ///
    /// Parameters such as `; charset=utf-8` are ignored and the comparison is
    /// case-insensitive. Returns `None` for unsupported types.
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let essence = essence(content_type);
        if essence == PDF {
            Some(DocumentKind::Pdf)
        } else if essence == CSV {
            Some(DocumentKind::Csv)
        } else if SPREADSHEET_TYPES.contains(&essence.as_str()) {
            Some(DocumentKind::Spreadsheet)
        } else {
            None
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentKind::Pdf => f.write_str("pdf"),
            DocumentKind::Csv => f.write_str("csv"),
            DocumentKind::Spreadsheet => f.write_str("spreadsheet"),
        }
    }
}

/// MIME type without parameters, trimmed and lowercased
pub fn essence(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameters_are_stripped() {
        assert_eq!(
            DocumentKind::from_content_type("text/csv; charset=utf-8"),
            Some(DocumentKind::Csv)
        );
        assert_eq!(
            DocumentKind::from_content_type(" Application/PDF "),
            Some(DocumentKind::Pdf)
        );
    }

    #[test]
    fn test_both_spreadsheet_types() {
        for content_type in SPREADSHEET_TYPES {
            assert_eq!(
                DocumentKind::from_content_type(content_type),
                Some(DocumentKind::Spreadsheet)
            );
        }
    }

    #[test]
    fn test_unsupported_types() {
        assert_eq!(DocumentKind::from_content_type("application/zip"), None);
        assert_eq!(DocumentKind::from_content_type(""), None);
        assert_eq!(DocumentKind::from_content_type("text/plain"), None);
    }
}
