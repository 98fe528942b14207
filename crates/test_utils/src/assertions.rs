//! Custom Test Assertions
//!
//! Assertion helpers for normalization outcomes and stored claims that
//! print the whole outcome when they fail.

use domain_claims::{Claim, ClaimStatus};
use domain_normalization::{AuditEvent, AuditStatus, EntitiesCreated, NormalizationOutcome};

/// Asserts a successful outcome and returns the linked entities
///
/// # Panics
///
/// Panics if the outcome is an error
pub fn assert_normalized(outcome: &NormalizationOutcome) -> &EntitiesCreated {
    match outcome {
        NormalizationOutcome::Success { entities_created, .. } => entities_created,
        NormalizationOutcome::Error { error, .. } => {
            panic!("Expected successful normalization, got error: {}", error)
        }
    }
}

/// Asserts an error outcome whose message contains `fragment`
///
/// # Panics
///
/// Panics if the outcome succeeded, does not request manual review, or
/// carries a different message
pub fn assert_failed_with(outcome: &NormalizationOutcome, fragment: &str) {
    match outcome {
        NormalizationOutcome::Error {
            error,
            requires_manual_review,
            ..
        } => {
            assert!(requires_manual_review, "Error outcome must request manual review");
            assert!(
                error.contains(fragment),
                "Expected error containing '{}', got '{}'",
                fragment,
                error
            );
        }
        NormalizationOutcome::Success { .. } => {
            panic!("Expected failed normalization, got {:?}", outcome)
        }
    }
}

/// Asserts the claim is `DENIED` and linked to the outcome's entities
pub fn assert_claim_denied(claim: &Claim, entities: &EntitiesCreated) {
    assert_eq!(claim.status, ClaimStatus::Denied, "claim {}", claim.id);
    assert_eq!(claim.patient_id, Some(entities.patient_id), "patient link");
    assert_eq!(claim.payer_id, Some(entities.payer_id), "payer link");
    assert_eq!(claim.denial_id, Some(entities.denial_id), "denial link");
    assert!(claim.error_message.is_none(), "unexpected error message {:?}", claim.error_message);
}

/// Asserts the claim is flagged for manual review with a message containing `fragment`
pub fn assert_manual_review(claim: &Claim, fragment: &str) {
    assert_eq!(claim.status, ClaimStatus::ManualReviewRequired, "claim {}", claim.id);
    let message = claim.error_message.as_deref().unwrap_or_default();
    assert!(
        message.contains(fragment),
        "Expected error message containing '{}', got '{}'",
        fragment,
        message
    );
}

/// Asserts exactly one audit event with the given status and returns it
pub fn assert_single_audit(events: &[AuditEvent], status: AuditStatus) -> &AuditEvent {
    assert_eq!(events.len(), 1, "Expected one audit event, got {:?}", events);
    let event = &events[0];
    assert_eq!(event.status, status, "audit status");
    event
}
