//! Normalization errors
//!
//! Every failure of a normalization run is one of these variants. The
//! pipeline converts them into an error outcome; none of them escape it.

use thiserror::Error;

use core_kernel::PortError;
use domain_claims::ClaimError;
use domain_party::PartyError;

/// Errors raised while reading a document
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Unsupported content type: {0}")]
    UnsupportedContentType(String),

    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    #[error("Text detection failed: {0}")]
    TextDetection(#[source] PortError),
}

/// Errors that end a normalization run
#[derive(Debug, Error)]
pub enum NormalizationError {
    /// The request itself could not be used; no store was touched
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Claim not found: {0}")]
    ClaimNotFound(String),

    #[error("Unsupported content type: {0}")]
    UnsupportedContentType(String),

    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    /// Every violated rule, in rule order
    #[error("Validation failed: {}", .0.join("; "))]
    ValidationFailed(Vec<String>),

    /// A patient, payer, denial or claim write failed; earlier writes stay
    #[error("Failed to persist {entity}: {source}")]
    EntityPersistence {
        entity: &'static str,
        #[source]
        source: PortError,
    },

    /// Object store, text detector or claim store unreachable or timed out
    #[error("{operation} failed: {source}")]
    Transport {
        operation: &'static str,
        #[source]
        source: PortError,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl NormalizationError {
    pub fn transport(operation: &'static str, source: PortError) -> Self {
        NormalizationError::Transport { operation, source }
    }

    /// Short machine-readable name of the variant
    pub fn kind(&self) -> &'static str {
        match self {
            NormalizationError::InvalidRequest(_) => "invalid_request",
            NormalizationError::ClaimNotFound(_) => "claim_not_found",
            NormalizationError::UnsupportedContentType(_) => "unsupported_content_type",
            NormalizationError::MalformedDocument(_) => "malformed_document",
            NormalizationError::ValidationFailed(_) => "validation_failed",
            NormalizationError::EntityPersistence { .. } => "entity_persistence",
            NormalizationError::Transport { .. } => "transport",
            NormalizationError::Internal(_) => "internal",
        }
    }
}

impl From<ExtractionError> for NormalizationError {
    fn from(err: ExtractionError) -> Self {
        match err {
            ExtractionError::UnsupportedContentType(ct) => NormalizationError::UnsupportedContentType(ct),
            ExtractionError::MalformedDocument(msg) => NormalizationError::MalformedDocument(msg),
            ExtractionError::TextDetection(source) => NormalizationError::transport("text detection", source),
        }
    }
}

impl From<PartyError> for NormalizationError {
    fn from(err: PartyError) -> Self {
        match err {
            PartyError::Persistence { entity, source } => NormalizationError::EntityPersistence { entity, source },
            other => NormalizationError::Internal(other.to_string()),
        }
    }
}

impl From<ClaimError> for NormalizationError {
    fn from(err: ClaimError) -> Self {
        match err {
            ClaimError::Persistence { entity, source } => NormalizationError::EntityPersistence { entity, source },
            ClaimError::ClaimNotFound(id) => NormalizationError::ClaimNotFound(id),
            other => NormalizationError::Internal(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_joins_rules() {
        let err = NormalizationError::ValidationFailed(vec![
            "Missing tenant_id".to_string(),
            "Missing hospital_id".to_string(),
        ]);
        assert_eq!(err.to_string(), "Validation failed: Missing tenant_id; Missing hospital_id");
        assert_eq!(err.kind(), "validation_failed");
    }

    #[test]
    fn test_text_detection_is_transport() {
        let err: NormalizationError = ExtractionError::TextDetection(PortError::connection("refused")).into();
        assert!(matches!(err, NormalizationError::Transport { operation: "text detection", .. }));
        assert_eq!(err.to_string(), "text detection failed: Connection error: refused");
    }

    #[test]
    fn test_party_persistence_keeps_entity() {
        let err: NormalizationError = PartyError::persistence("patient", PortError::connection("down")).into();
        assert!(matches!(err, NormalizationError::EntityPersistence { entity: "patient", .. }));
        assert_eq!(err.kind(), "entity_persistence");
    }

    #[test]
    fn test_unsupported_content_type_message() {
        let err: NormalizationError = ExtractionError::UnsupportedContentType("application/zip".to_string()).into();
        assert_eq!(err.to_string(), "Unsupported content type: application/zip");
    }
}
