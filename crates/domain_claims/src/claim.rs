//! Claim aggregate

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use core_kernel::{ClaimId, DenialId, HospitalId, PatientId, PayerId, TenantId};
use crate::error::ClaimError;

/// Claim lifecycle status
///
/// Normalization only ever writes `Denied` (success) or
/// `ManualReviewRequired` (failure); the other states belong to upstream
/// upload handling and downstream analysis stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClaimStatus {
    /// Record created, file not yet confirmed
    New,
    /// Upload in progress
    UploadPending,
    /// Normalized denial with linked entities
    Denied,
    AiAnalyzed,
    HumanReview,
    Submitted,
    Recovered,
    Failed,
    /// Normalization failed; a person has to look at it
    ManualReviewRequired,
}

impl ClaimStatus {
    /// Returns the persisted representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimStatus::New => "NEW",
            ClaimStatus::UploadPending => "UPLOAD_PENDING",
            ClaimStatus::Denied => "DENIED",
            ClaimStatus::AiAnalyzed => "AI_ANALYZED",
            ClaimStatus::HumanReview => "HUMAN_REVIEW",
            ClaimStatus::Submitted => "SUBMITTED",
            ClaimStatus::Recovered => "RECOVERED",
            ClaimStatus::Failed => "FAILED",
            ClaimStatus::ManualReviewRequired => "MANUAL_REVIEW_REQUIRED",
        }
    }

    /// Returns true for the two states written by normalization
    pub fn is_normalization_outcome(&self) -> bool {
        matches!(self, ClaimStatus::Denied | ClaimStatus::ManualReviewRequired)
    }
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClaimStatus {
    type Err = ClaimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let status = match s.trim().to_ascii_uppercase().as_str() {
            "NEW" => ClaimStatus::New,
            "UPLOAD_PENDING" => ClaimStatus::UploadPending,
            "DENIED" => ClaimStatus::Denied,
            "AI_ANALYZED" => ClaimStatus::AiAnalyzed,
            "HUMAN_REVIEW" => ClaimStatus::HumanReview,
            "SUBMITTED" => ClaimStatus::Submitted,
            "RECOVERED" => ClaimStatus::Recovered,
            "FAILED" => ClaimStatus::Failed,
            "MANUAL_REVIEW_REQUIRED" => ClaimStatus::ManualReviewRequired,
            other => return Err(ClaimError::UnknownStatus(other.to_string())),
        };
        Ok(status)
    }
}

/// Where the uploaded document lives in the object store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageLocation {
    pub bucket: String,
    pub key: String,
}

impl StorageLocation {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }
}

impl fmt::Display for StorageLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.bucket, self.key)
    }
}

/// Metadata of the uploaded document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredFile {
    /// Name the file was uploaded under
    pub original_filename: Option<String>,
    /// Declared MIME type, possibly with parameters
    pub content_type: String,
    /// Size in bytes as recorded at upload
    pub file_size: i64,
    pub location: StorageLocation,
}

/// Fields written onto a claim by a successful normalization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimUpdate {
    pub claim_number: Option<String>,
    pub patient_id: PatientId,
    pub payer_id: PayerId,
    pub denial_id: DenialId,
    pub claim_amount: Decimal,
}

/// An uploaded insurance claim
///
/// Created upstream in `New`/`UploadPending`; normalization fills in the
/// entity links and amounts. Tenant and hospital are optional here because the
/// store may hold incomplete rows; validation rejects those before any write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claim {
    pub id: ClaimId,
    pub tenant_id: Option<TenantId>,
    pub hospital_id: Option<HospitalId>,
    pub patient_id: Option<PatientId>,
    pub payer_id: Option<PayerId>,
    pub denial_id: Option<DenialId>,
    pub claim_number: Option<String>,
    pub claim_amount: Decimal,
    pub denied_amount: Decimal,
    pub recovered_amount: Decimal,
    pub status: ClaimStatus,
    pub file: StoredFile,
    /// Populated only when normalization failed
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Claim {
    /// Creates a claim as it looks right after upload
    pub fn uploaded(
        tenant_id: Option<TenantId>,
        hospital_id: Option<HospitalId>,
        file: StoredFile,
    ) -> Self {
        let now = Utc::now();

        Self {
            id: ClaimId::new_v7(),
            tenant_id,
            hospital_id,
            patient_id: None,
            payer_id: None,
            denial_id: None,
            claim_number: None,
            claim_amount: dec!(0),
            denied_amount: dec!(0),
            recovered_amount: dec!(0),
            status: ClaimStatus::UploadPending,
            file,
            error_message: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Writes normalized fields without touching the status
    pub fn apply_normalization(&mut self, update: &ClaimUpdate) {
        self.claim_number = update.claim_number.clone();
        self.patient_id = Some(update.patient_id);
        self.payer_id = Some(update.payer_id);
        self.denial_id = Some(update.denial_id);
        self.claim_amount = update.claim_amount;
        self.updated_at = Utc::now();
    }

    /// Sets the lifecycle status
    ///
    /// Any status other than manual review clears the previous error message.
    pub fn set_status(&mut self, status: ClaimStatus) {
        if status != ClaimStatus::ManualReviewRequired {
            self.error_message = None;
        }
        self.status = status;
        self.updated_at = Utc::now();
    }

    /// Flags the claim for manual review with the failure reason
    pub fn mark_manual_review(&mut self, error_message: impl Into<String>) {
        self.status = ClaimStatus::ManualReviewRequired;
        self.error_message = Some(error_message.into());
        self.updated_at = Utc::now();
    }

    /// Identifier used when the document carried no claim number
    pub fn fallback_identifier(&self) -> Option<&str> {
        self.file
            .original_filename
            .as_deref()
            .filter(|name| !name.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file() -> StoredFile {
        StoredFile {
            original_filename: Some("denial.csv".to_string()),
            content_type: "text/csv".to_string(),
            file_size: 64,
            location: StorageLocation::new("claims", "tenant-a/denial.csv"),
        }
    }

    #[test]
    fn test_status_round_trips_through_text() {
        for status in [
            ClaimStatus::New,
            ClaimStatus::UploadPending,
            ClaimStatus::Denied,
            ClaimStatus::AiAnalyzed,
            ClaimStatus::HumanReview,
            ClaimStatus::Submitted,
            ClaimStatus::Recovered,
            ClaimStatus::Failed,
            ClaimStatus::ManualReviewRequired,
        ] {
            assert_eq!(status.as_str().parse::<ClaimStatus>().unwrap(), status);
        }
        assert!("ARCHIVED".parse::<ClaimStatus>().is_err());
    }

    #[test]
    fn test_status_serializes_screaming_snake() {
        let json = serde_json::to_string(&ClaimStatus::ManualReviewRequired).unwrap();
        assert_eq!(json, "\"MANUAL_REVIEW_REQUIRED\"");
    }

    #[test]
    fn test_denied_status_clears_previous_error() {
        let mut claim = Claim::uploaded(TenantId::parse("t"), HospitalId::parse("h"), file());
        claim.mark_manual_review("object store read failed: Timeout");

        claim.set_status(ClaimStatus::Denied);

        assert_eq!(claim.status, ClaimStatus::Denied);
        assert!(claim.error_message.is_none());
    }

    #[test]
    fn test_apply_keeps_status() {
        let mut claim = Claim::uploaded(TenantId::parse("t"), HospitalId::parse("h"), file());
        claim.apply_normalization(&ClaimUpdate {
            claim_number: Some("CLM-1".to_string()),
            patient_id: PatientId::new(),
            payer_id: PayerId::new(),
            denial_id: DenialId::new(),
            claim_amount: dec!(100),
        });
        assert_eq!(claim.status, ClaimStatus::UploadPending);
        assert!(claim.patient_id.is_some());
        assert!(claim.error_message.is_none());
    }

    #[test]
    fn test_blank_filename_is_no_fallback() {
        let mut claim = Claim::uploaded(None, None, file());
        assert_eq!(claim.fallback_identifier(), Some("denial.csv"));
        claim.file.original_filename = Some("  ".to_string());
        assert_eq!(claim.fallback_identifier(), None);
    }
}
