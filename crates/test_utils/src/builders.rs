//! Test Data Builders
//!
//! Builders with sensible defaults so tests only spell out the fields they
//! care about.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use core_kernel::{ClaimId, HospitalId, TenantId};
use domain_claims::{Claim, ClaimStatus, StorageLocation, StoredFile};
use domain_party::{Patient, Payer, PayerType};

use crate::fixtures::{ContentTypes, ScopeFixtures};

/// Bucket every built claim points into
pub const TEST_BUCKET: &str = "claim-documents";

/// Builder for uploaded claims
pub struct ClaimBuilder {
    id: ClaimId,
    tenant_id: Option<TenantId>,
    hospital_id: Option<HospitalId>,
    original_filename: Option<String>,
    content_type: String,
    file_size: i64,
    key: Option<String>,
    status: ClaimStatus,
    claim_number: Option<String>,
    claim_amount: Decimal,
    created_at: DateTime<Utc>,
}

impl Default for ClaimBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClaimBuilder {
    /// A CSV upload for the fixture tenant and hospital
    pub fn new() -> Self {
        Self {
            id: ClaimId::new_v7(),
            tenant_id: Some(ScopeFixtures::tenant()),
            hospital_id: Some(ScopeFixtures::hospital()),
            original_filename: Some("denial_export.csv".to_string()),
            content_type: ContentTypes::CSV.to_string(),
            file_size: 0,
            key: None,
            status: ClaimStatus::UploadPending,
            claim_number: None,
            claim_amount: dec!(0),
            created_at: Utc::now(),
        }
    }

    pub fn pdf() -> Self {
        Self::new()
            .with_content_type(ContentTypes::PDF)
            .with_filename("denial_letter.pdf")
    }

    pub fn spreadsheet() -> Self {
        Self::new()
            .with_content_type(ContentTypes::XLSX)
            .with_filename("denials_march.xlsx")
    }

    pub fn with_id(mut self, id: ClaimId) -> Self {
        self.id = id;
        self
    }

    pub fn with_tenant(mut self, tenant_id: TenantId) -> Self {
        self.tenant_id = Some(tenant_id);
        self
    }

    pub fn without_tenant(mut self) -> Self {
        self.tenant_id = None;
        self
    }

    pub fn with_hospital(mut self, hospital_id: HospitalId) -> Self {
        self.hospital_id = Some(hospital_id);
        self
    }

    pub fn without_hospital(mut self) -> Self {
        self.hospital_id = None;
        self
    }

    pub fn with_filename(mut self, name: impl Into<String>) -> Self {
        self.original_filename = Some(name.into());
        self
    }

    pub fn without_filename(mut self) -> Self {
        self.original_filename = None;
        self
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    pub fn with_file_size(mut self, size: i64) -> Self {
        self.file_size = size;
        self
    }

    /// Object key inside [`TEST_BUCKET`]; defaults to `<tenant>/<claim id>`
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_status(mut self, status: ClaimStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_claim_number(mut self, number: impl Into<String>) -> Self {
        self.claim_number = Some(number.into());
        self
    }

    pub fn with_claim_amount(mut self, amount: Decimal) -> Self {
        self.claim_amount = amount;
        self
    }

    pub fn build(self) -> Claim {
        let key = self.key.unwrap_or_else(|| {
            let scope = self.tenant_id.as_ref().map(|t| t.as_str()).unwrap_or("unscoped");
            format!("{}/{}", scope, self.id.as_uuid())
        });

        Claim {
            id: self.id,
            tenant_id: self.tenant_id,
            hospital_id: self.hospital_id,
            patient_id: None,
            payer_id: None,
            denial_id: None,
            claim_number: self.claim_number,
            claim_amount: self.claim_amount,
            denied_amount: dec!(0),
            recovered_amount: dec!(0),
            status: self.status,
            file: StoredFile {
                original_filename: self.original_filename,
                content_type: self.content_type,
                file_size: self.file_size,
                location: StorageLocation::new(TEST_BUCKET, key),
            },
            error_message: None,
            created_at: self.created_at,
            updated_at: self.created_at,
        }
    }
}

/// Builder for patients already known to a tenant
pub struct PatientBuilder {
    tenant_id: TenantId,
    hospital_id: HospitalId,
    name: String,
}

impl PatientBuilder {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            tenant_id: ScopeFixtures::tenant(),
            hospital_id: ScopeFixtures::hospital(),
            name: name.into(),
        }
    }

    pub fn with_tenant(mut self, tenant_id: TenantId) -> Self {
        self.tenant_id = tenant_id;
        self
    }

    pub fn build(self) -> Patient {
        Patient::new(self.tenant_id, self.hospital_id, self.name)
    }
}

/// Builder for payers already known to a tenant
pub struct PayerBuilder {
    tenant_id: TenantId,
    name: String,
    payer_type: PayerType,
}

impl PayerBuilder {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            tenant_id: ScopeFixtures::tenant(),
            name: name.into(),
            payer_type: PayerType::Tpa,
        }
    }

    pub fn with_tenant(mut self, tenant_id: TenantId) -> Self {
        self.tenant_id = tenant_id;
        self
    }

    pub fn with_type(mut self, payer_type: PayerType) -> Self {
        self.payer_type = payer_type;
        self
    }

    pub fn build(self) -> Payer {
        let mut payer = Payer::new(self.tenant_id, self.name);
        payer.payer_type = self.payer_type;
        payer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_claim_is_scoped_csv_upload() {
        let claim = ClaimBuilder::new().build();
        assert!(claim.tenant_id.is_some());
        assert!(claim.hospital_id.is_some());
        assert_eq!(claim.file.content_type, "text/csv");
        assert_eq!(claim.status, ClaimStatus::UploadPending);
        assert_eq!(claim.file.location.bucket, TEST_BUCKET);
    }

    #[test]
    fn test_default_key_uses_tenant_and_id() {
        let claim = ClaimBuilder::new().build();
        assert_eq!(
            claim.file.location.key,
            format!("tenant-apollo/{}", claim.id.as_uuid())
        );
    }

    #[test]
    fn test_payer_builder_sets_type() {
        let payer = PayerBuilder::named("LIC").with_type(PayerType::Insurer).build();
        assert_eq!(payer.payer_type, PayerType::Insurer);
    }
}
