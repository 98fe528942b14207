//! Result of a normalization run as reported to callers

use serde::{Deserialize, Serialize};

use core_kernel::{DenialId, PatientId, PayerId};

use crate::error::NormalizationError;
use crate::extraction::ProcessingSummary;

/// Entities linked to the claim by a successful run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitiesCreated {
    pub patient_id: PatientId,
    pub payer_id: PayerId,
    pub denial_id: DenialId,
    pub claim_updated: bool,
}

/// Outcome of one normalization run
///
/// Callers tell success from failure by `status` alone:
///
/// ```json
/// {"status": "success", "claim_id": "...", "entities_created": {...}, "processing_summary": {...}}
/// {"status": "error", "claim_id": "...", "error": "...", "requires_manual_review": true}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum NormalizationOutcome {
    Success {
        claim_id: String,
        entities_created: EntitiesCreated,
        processing_summary: ProcessingSummary,
    },
    Error {
        claim_id: String,
        error: String,
        requires_manual_review: bool,
    },
}

impl NormalizationOutcome {
    pub fn success(
        claim_id: impl Into<String>,
        entities_created: EntitiesCreated,
        processing_summary: ProcessingSummary,
    ) -> Self {
        NormalizationOutcome::Success {
            claim_id: claim_id.into(),
            entities_created,
            processing_summary,
        }
    }

    pub fn failure(claim_id: impl Into<String>, error: &NormalizationError) -> Self {
        NormalizationOutcome::Error {
            claim_id: claim_id.into(),
            error: error.to_string(),
            requires_manual_review: true,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, NormalizationOutcome::Success { .. })
    }

    pub fn claim_id(&self) -> &str {
        match self {
            NormalizationOutcome::Success { claim_id, .. } | NormalizationOutcome::Error { claim_id, .. } => claim_id,
        }
    }

    /// Error text of a failed run
    pub fn error(&self) -> Option<&str> {
        match self {
            NormalizationOutcome::Error { error, .. } => Some(error),
            NormalizationOutcome::Success { .. } => None,
        }
    }
}
