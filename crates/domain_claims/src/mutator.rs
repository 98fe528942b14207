//! Claim mutation for the normalization outcome
//!
//! Fields are written first and the status second. A crash between the two
//! leaves the claim in its prior status with the new links attached, which a
//! re-run overwrites; the reverse order could expose a `DENIED` claim with no
//! data behind it.

use std::sync::Arc;
use tracing::info;

use core_kernel::{ClaimId, DenialId, PatientId, PayerId};

use crate::amount::amount_or_zero;
use crate::claim::{Claim, ClaimStatus, ClaimUpdate};
use crate::error::ClaimError;
use crate::ports::ClaimPort;

/// Parsed values the mutator writes onto the claim
#[derive(Debug, Clone, Default)]
pub struct ClaimFields<'a> {
    pub claim_number: Option<&'a str>,
    pub claim_amount: Option<&'a str>,
}

/// Applies normalization results to claim records
#[derive(Clone)]
pub struct ClaimMutator {
    claims: Arc<dyn ClaimPort>,
}

impl ClaimMutator {
    pub fn new(claims: Arc<dyn ClaimPort>) -> Self {
        Self { claims }
    }

    /// Builds the update written by [`ClaimMutator::apply`]
    ///
    /// The claim number falls back to the uploaded filename.
    pub fn build_update(
        claim: &Claim,
        fields: &ClaimFields<'_>,
        patient_id: PatientId,
        payer_id: PayerId,
        denial_id: DenialId,
    ) -> ClaimUpdate {
        let claim_number = fields
            .claim_number
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .or_else(|| claim.fallback_identifier())
            .map(str::to_string);

        ClaimUpdate {
            claim_number,
            patient_id,
            payer_id,
            denial_id,
            claim_amount: amount_or_zero(claim.id, "claim_amount", fields.claim_amount),
        }
    }

    /// Writes the resolved links and parsed fields
    pub async fn apply(
        &self,
        claim: &Claim,
        fields: &ClaimFields<'_>,
        patient_id: PatientId,
        payer_id: PayerId,
        denial_id: DenialId,
    ) -> Result<ClaimUpdate, ClaimError> {
        let update = Self::build_update(claim, fields, patient_id, payer_id, denial_id);
        self.claims
            .apply_normalization(claim.id, &update)
            .await
            .map_err(|e| ClaimError::persistence("claim", e))?;
        Ok(update)
    }

    /// Sets the status; call only after [`ClaimMutator::apply`] succeeded
    pub async fn set_status(&self, claim_id: ClaimId, status: ClaimStatus) -> Result<(), ClaimError> {
        self.claims
            .set_status(claim_id, status)
            .await
            .map_err(|e| ClaimError::persistence("claim status", e))?;
        info!(claim_id = %claim_id, status = %status, "Claim status updated");
        Ok(())
    }

    /// Flags the claim for manual review
    pub async fn mark_manual_review(&self, claim_id: ClaimId, error_message: &str) -> Result<(), ClaimError> {
        self.claims
            .mark_manual_review(claim_id, error_message)
            .await
            .map_err(|e| ClaimError::persistence("claim status", e))
    }
}
