//! Normalization DTOs
//!
//! The single-claim endpoint takes `NormalizationRequest` and answers with
//! `NormalizationOutcome` directly; only the batch endpoint needs its own
//! shapes.

use serde::{Deserialize, Serialize};
use validator::Validate;

use domain_normalization::NormalizationOutcome;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BatchNormalizationRequest {
    #[validate(length(min = 1, message = "claim_ids must not be empty"))]
    pub claim_ids: Vec<String>,

    /// Applied to every request of the batch
    #[serde(default)]
    #[validate(length(max = 128))]
    pub tenant_id: Option<String>,
}

/// Outcomes in request order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchNormalizationResponse {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub outcomes: Vec<NormalizationOutcome>,
}

impl BatchNormalizationResponse {
    pub fn from_outcomes(outcomes: Vec<NormalizationOutcome>) -> Self {
        let succeeded = outcomes.iter().filter(|o| o.is_success()).count();
        Self {
            total: outcomes.len(),
            succeeded,
            failed: outcomes.len() - succeeded,
            outcomes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_normalization::NormalizationError;

    #[test]
    fn test_counts() {
        let outcomes = vec![
            NormalizationOutcome::failure("a", &NormalizationError::ClaimNotFound("a".to_string())),
            NormalizationOutcome::failure("b", &NormalizationError::InvalidRequest("empty".to_string())),
        ];
        let response = BatchNormalizationResponse::from_outcomes(outcomes);
        assert_eq!(response.total, 2);
        assert_eq!(response.succeeded, 0);
        assert_eq!(response.failed, 2);
    }

    #[test]
    fn test_empty_batch_is_invalid() {
        let request: BatchNormalizationRequest = serde_json::from_str(r#"{"claim_ids": []}"#).unwrap();
        assert!(request.validate().is_err());
    }
}
