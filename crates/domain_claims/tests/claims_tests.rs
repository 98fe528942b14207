//! Tests for the claim record and denial types

use rust_decimal_macros::dec;

use core_kernel::{ClaimId, DenialId, HospitalId, PatientId, PayerId, TenantId};

use domain_claims::claim::{Claim, ClaimStatus, ClaimUpdate, StorageLocation, StoredFile};
use domain_claims::denial::Denial;

fn stored_file(name: Option<&str>) -> StoredFile {
    StoredFile {
        original_filename: name.map(str::to_string),
        content_type: "application/pdf".to_string(),
        file_size: 2048,
        location: StorageLocation::new("claims-bucket", "uploads/denial.pdf"),
    }
}

// ============================================================================
// Claim Tests
// ============================================================================

mod claim_tests {
    use super::*;

    #[test]
    fn test_uploaded_claim_defaults() {
        let claim = Claim::uploaded(
            TenantId::parse("tenant-a"),
            HospitalId::parse("hosp-1"),
            stored_file(Some("denial.pdf")),
        );

        assert_eq!(claim.status, ClaimStatus::UploadPending);
        assert!(claim.patient_id.is_none());
        assert!(claim.payer_id.is_none());
        assert!(claim.denial_id.is_none());
        assert_eq!(claim.claim_amount, dec!(0));
        assert_eq!(claim.recovered_amount, dec!(0));
        assert!(claim.error_message.is_none());
    }

    #[test]
    fn test_manual_review_sets_message() {
        let mut claim = Claim::uploaded(None, None, stored_file(None));
        claim.mark_manual_review("Validation failed: Missing tenant_id");

        assert_eq!(claim.status, ClaimStatus::ManualReviewRequired);
        assert_eq!(
            claim.error_message.as_deref(),
            Some("Validation failed: Missing tenant_id")
        );
    }

    #[test]
    fn test_apply_normalization_links_entities() {
        let mut claim = Claim::uploaded(
            TenantId::parse("tenant-a"),
            HospitalId::parse("hosp-1"),
            stored_file(Some("denial.pdf")),
        );
        let update = ClaimUpdate {
            claim_number: Some("clm-2024-001".to_string()),
            patient_id: PatientId::new(),
            payer_id: PayerId::new(),
            denial_id: DenialId::new(),
            claim_amount: dec!(45000.00),
        };

        claim.apply_normalization(&update);
        claim.set_status(ClaimStatus::Denied);

        assert_eq!(claim.patient_id, Some(update.patient_id));
        assert_eq!(claim.payer_id, Some(update.payer_id));
        assert_eq!(claim.denial_id, Some(update.denial_id));
        assert_eq!(claim.claim_amount, dec!(45000.00));
        assert_eq!(claim.status, ClaimStatus::Denied);
    }

    #[test]
    fn test_normalization_outcome_states() {
        assert!(ClaimStatus::Denied.is_normalization_outcome());
        assert!(ClaimStatus::ManualReviewRequired.is_normalization_outcome());
        assert!(!ClaimStatus::UploadPending.is_normalization_outcome());
        assert!(!ClaimStatus::Recovered.is_normalization_outcome());
    }

    #[test]
    fn test_status_parse_is_case_insensitive() {
        assert_eq!("denied".parse::<ClaimStatus>().unwrap(), ClaimStatus::Denied);
        assert_eq!(
            " manual_review_required ".parse::<ClaimStatus>().unwrap(),
            ClaimStatus::ManualReviewRequired
        );
    }

    #[test]
    fn test_storage_location_display() {
        let location = StorageLocation::new("claims-bucket", "uploads/denial.pdf");
        assert_eq!(location.to_string(), "claims-bucket/uploads/denial.pdf");
    }
}

// ============================================================================
// Denial Tests
// ============================================================================

mod denial_tests {
    use super::*;

    #[test]
    fn test_denial_copies_reason_into_text() {
        let denial = Denial::new(
            ClaimId::new(),
            TenantId::parse("tenant-a").unwrap(),
            "pre-existing condition",
            dec!(1200),
        );

        assert_eq!(denial.reason, "pre-existing condition");
        assert_eq!(denial.denial_text, "pre-existing condition");
        assert!(denial.classification.is_none());
    }

    #[test]
    fn test_denial_serializes() {
        let denial = Denial::new(
            ClaimId::new(),
            TenantId::parse("tenant-a").unwrap(),
            "policy lapsed",
            dec!(99.50),
        );

        let json = serde_json::to_value(&denial).unwrap();
        assert_eq!(json["tenant_id"], "tenant-a");
        assert_eq!(json["reason"], "policy lapsed");
    }
}
