//! Normalization request

use serde::{Deserialize, Serialize};
use validator::Validate;

use core_kernel::{ClaimId, TenantId};

use crate::error::NormalizationError;

/// Request to normalize one uploaded claim
///
/// Only `claim_id` is required. A body without it still deserializes and is
/// refused by [`NormalizationRequest::parse_claim_id`], so callers get an
/// error outcome rather than a transport-level rejection. Unknown fields sent
/// by upstream callers are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct NormalizationRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "claim_id is required"))]
    pub claim_id: String,

    /// Labels the audit event when the claim itself cannot be loaded
    #[serde(default)]
    #[validate(length(max = 128))]
    pub tenant_id: Option<String>,
}

impl NormalizationRequest {
    pub fn new(claim_id: impl Into<String>) -> Self {
        Self {
            claim_id: claim_id.into(),
            tenant_id: None,
        }
    }

    pub fn for_claim(claim_id: ClaimId) -> Self {
        Self::new(claim_id.as_uuid().to_string())
    }

    /// Validates the request and parses its claim id
    pub fn parse_claim_id(&self) -> Result<ClaimId, NormalizationError> {
        self.validate()
            .map_err(|e| NormalizationError::InvalidRequest(e.to_string()))?;
        self.claim_id
            .trim()
            .parse()
            .map_err(|e| NormalizationError::InvalidRequest(format!("claim_id '{}' is not a UUID: {}", self.claim_id, e)))
    }

    pub fn tenant_hint(&self) -> Option<TenantId> {
        TenantId::parse_optional(self.tenant_id.as_deref())
    }
}
