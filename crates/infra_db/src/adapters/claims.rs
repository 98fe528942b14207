//! PostgreSQL Claims Adapter
//!
//! Implements `ClaimPort` and `DenialPort` on top of `ClaimsRepository`.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::adapters::PostgresClaimAdapter;
//! use domain_claims::ClaimPort;
//! use std::sync::Arc;
//!
//! let adapter = Arc::new(PostgresClaimAdapter::new(pool));
//! let claims: Arc<dyn ClaimPort> = adapter.clone();
//! let claim = claims.get_claim(claim_id).await?;
//! ```

use async_trait::async_trait;
use sqlx::PgPool;
use std::str::FromStr;
use tracing::{debug, instrument};

use core_kernel::{
    ClaimId, DomainPort, HealthCheckResult, HealthCheckable, HospitalId, PortError, TenantId,
};
use domain_claims::{Claim, ClaimPort, ClaimStatus, ClaimUpdate, Denial, DenialPort, StorageLocation, StoredFile};

use super::party::ping;
use crate::repositories::claims::{ClaimNormalization, ClaimRow, ClaimsRepository, DenialRow};

/// PostgreSQL-backed implementation of the claim and denial ports
///
/// # Error Handling
///
/// Database errors are translated to `PortError` through
/// `From<DatabaseError>`; a stored status the domain does not know becomes
/// `PortError::Transformation`.
#[derive(Debug, Clone)]
pub struct PostgresClaimAdapter {
    repository: ClaimsRepository,
    pool: PgPool,
}

impl PostgresClaimAdapter {
    /// Creates a new PostgreSQL claims adapter
    ///
    /// # Arguments
    ///
    /// * `pool` - The PostgreSQL connection pool
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: ClaimsRepository::new(pool.clone()),
            pool,
        }
    }

    /// Returns a reference to the underlying repository
    pub fn repository(&self) -> &ClaimsRepository {
        &self.repository
    }
}

impl DomainPort for PostgresClaimAdapter {}

#[async_trait]
impl HealthCheckable for PostgresClaimAdapter {
    async fn health_check(&self) -> HealthCheckResult {
        ping(&self.pool, "postgres-claim-adapter").await
    }
}

#[async_trait]
impl ClaimPort for PostgresClaimAdapter {
    #[instrument(skip(self), fields(claim_id = %id))]
    async fn get_claim(&self, id: ClaimId) -> Result<Option<Claim>, PortError> {
        debug!("Fetching claim");

        let row = self.repository.find_by_id(*id.as_uuid()).await?;
        row.map(row_to_claim).transpose()
    }

    #[instrument(skip(self, update), fields(claim_id = %id))]
    async fn apply_normalization(&self, id: ClaimId, update: &ClaimUpdate) -> Result<(), PortError> {
        self.repository
            .apply_normalization(*id.as_uuid(), &update_to_row(update))
            .await?;
        Ok(())
    }

    #[instrument(skip(self), fields(claim_id = %id))]
    async fn set_status(&self, id: ClaimId, status: ClaimStatus) -> Result<(), PortError> {
        self.repository.update_status(*id.as_uuid(), status.as_str()).await?;
        Ok(())
    }

    #[instrument(skip(self, error_message), fields(claim_id = %id))]
    async fn mark_manual_review(&self, id: ClaimId, error_message: &str) -> Result<(), PortError> {
        self.repository
            .update_status_with_error(*id.as_uuid(), ClaimStatus::ManualReviewRequired.as_str(), error_message)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl DenialPort for PostgresClaimAdapter {
    #[instrument(skip(self, denial), fields(claim_id = %denial.claim_id, denial_id = %denial.id))]
    async fn insert_denial(&self, denial: &Denial) -> Result<(), PortError> {
        self.repository.insert_denial(&denial_to_row(denial)).await?;
        Ok(())
    }
}

// ============================================================================
// Conversion Functions
// ============================================================================

/// Converts a database claim row to a domain Claim
pub fn row_to_claim(row: ClaimRow) -> Result<Claim, PortError> {
    let status = ClaimStatus::from_str(&row.status)
        .map_err(|e| PortError::transformation(format!("claim {}: {}", row.id, e)))?;

    Ok(Claim {
        id: ClaimId::from(row.id),
        tenant_id: TenantId::parse_optional(row.tenant_id.as_deref()),
        hospital_id: HospitalId::parse_optional(row.hospital_id.as_deref()),
        patient_id: row.patient_id.map(Into::into),
        payer_id: row.payer_id.map(Into::into),
        denial_id: row.denial_id.map(Into::into),
        claim_number: row.claim_number,
        claim_amount: row.claim_amount,
        denied_amount: row.denied_amount,
        recovered_amount: row.recovered_amount,
        status,
        file: StoredFile {
            original_filename: row.original_filename,
            content_type: row.content_type,
            file_size: row.file_size,
            location: StorageLocation::new(row.storage_bucket, row.storage_key),
        },
        error_message: row.error_message,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

/// Converts a domain Claim to a database row
pub fn claim_to_row(claim: &Claim) -> ClaimRow {
    ClaimRow {
        id: *claim.id.as_uuid(),
        tenant_id: claim.tenant_id.as_ref().map(|t| t.as_str().to_string()),
        hospital_id: claim.hospital_id.as_ref().map(|h| h.as_str().to_string()),
        patient_id: claim.patient_id.map(Into::into),
        payer_id: claim.payer_id.map(Into::into),
        denial_id: claim.denial_id.map(Into::into),
        claim_number: claim.claim_number.clone(),
        claim_amount: claim.claim_amount,
        denied_amount: claim.denied_amount,
        recovered_amount: claim.recovered_amount,
        status: claim.status.as_str().to_string(),
        original_filename: claim.file.original_filename.clone(),
        content_type: claim.file.content_type.clone(),
        file_size: claim.file.file_size,
        storage_bucket: claim.file.location.bucket.clone(),
        storage_key: claim.file.location.key.clone(),
        error_message: claim.error_message.clone(),
        created_at: claim.created_at,
        updated_at: claim.updated_at,
    }
}

fn update_to_row(update: &ClaimUpdate) -> ClaimNormalization {
    ClaimNormalization {
        claim_number: update.claim_number.clone(),
        patient_id: update.patient_id.into(),
        payer_id: update.payer_id.into(),
        denial_id: update.denial_id.into(),
        claim_amount: update.claim_amount,
    }
}

/// Converts a domain Denial to a database row
pub fn denial_to_row(denial: &Denial) -> DenialRow {
    DenialRow {
        id: *denial.id.as_uuid(),
        claim_id: *denial.claim_id.as_uuid(),
        tenant_id: denial.tenant_id.as_str().to_string(),
        reason: denial.reason.clone(),
        denial_text: denial.denial_text.clone(),
        denied_amount: denial.denied_amount,
        classification: denial.classification.clone(),
        created_at: denial.created_at,
    }
}
