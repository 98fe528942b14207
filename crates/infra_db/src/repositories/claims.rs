//! Claims repository implementation
//!
//! This module provides database access for uploaded claims and the denials
//! normalization attaches to them. Claims are inserted by the upload service;
//! normalization only reads them and updates the normalization columns.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::DatabaseError;

const CLAIM_COLUMNS: &str = r#"
    id, tenant_id, hospital_id, patient_id, payer_id, denial_id,
    claim_number, claim_amount, denied_amount, recovered_amount, status,
    original_filename, content_type, file_size, storage_bucket, storage_key,
    error_message, created_at, updated_at
"#;

/// Repository for managing claims data
#[derive(Debug, Clone)]
pub struct ClaimsRepository {
    pool: PgPool,
}

impl ClaimsRepository {
    /// Creates a new ClaimsRepository with the given connection pool
    ///
    /// # Arguments
    ///
    /// * `pool` - The PostgreSQL connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Retrieves a claim by its identifier
    ///
    /// # Returns
    ///
    /// The claim record, or `None` when no claim has this id
    pub async fn find_by_id(&self, claim_id: Uuid) -> Result<Option<ClaimRow>, DatabaseError> {
        let query = format!("SELECT {} FROM claims WHERE id = $1", CLAIM_COLUMNS);
        let row = sqlx::query_as::<_, ClaimRow>(&query)
            .bind(claim_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    /// Inserts a claim as the upload service would
    pub async fn insert(&self, claim: &ClaimRow) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO claims (
                id, tenant_id, hospital_id, patient_id, payer_id, denial_id,
                claim_number, claim_amount, denied_amount, recovered_amount, status,
                original_filename, content_type, file_size, storage_bucket, storage_key,
                error_message, created_at, updated_at
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11,
                $12, $13, $14, $15, $16, $17, $18, $19
            )
            "#,
        )
        .bind(claim.id)
        .bind(&claim.tenant_id)
        .bind(&claim.hospital_id)
        .bind(claim.patient_id)
        .bind(claim.payer_id)
        .bind(claim.denial_id)
        .bind(&claim.claim_number)
        .bind(claim.claim_amount)
        .bind(claim.denied_amount)
        .bind(claim.recovered_amount)
        .bind(&claim.status)
        .bind(&claim.original_filename)
        .bind(&claim.content_type)
        .bind(claim.file_size)
        .bind(&claim.storage_bucket)
        .bind(&claim.storage_key)
        .bind(&claim.error_message)
        .bind(claim.created_at)
        .bind(claim.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Writes the normalization columns without touching the status
    ///
    /// # Arguments
    ///
    /// * `claim_id` - The claim to update
    /// * `update` - Claim number, entity links and claim amount
    pub async fn apply_normalization(&self, claim_id: Uuid, update: &ClaimNormalization) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            r#"
            UPDATE claims
            SET claim_number = $2,
                patient_id = $3,
                payer_id = $4,
                denial_id = $5,
                claim_amount = $6,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(claim_id)
        .bind(&update.claim_number)
        .bind(update.patient_id)
        .bind(update.payer_id)
        .bind(update.denial_id)
        .bind(update.claim_amount)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("Claim", claim_id));
        }
        Ok(())
    }

    /// Sets the lifecycle status, clearing the error message unless the
    /// claim is going to manual review
    pub async fn update_status(&self, claim_id: Uuid, status: &str) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            r#"
            UPDATE claims
            SET status = $2,
                error_message = CASE WHEN $2 = 'MANUAL_REVIEW_REQUIRED' THEN error_message ELSE NULL END,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(claim_id)
        .bind(status)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("Claim", claim_id));
        }
        Ok(())
    }

    /// Sets the status together with the error message
    pub async fn update_status_with_error(
        &self,
        claim_id: Uuid,
        status: &str,
        error_message: &str,
    ) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            "UPDATE claims SET status = $2, error_message = $3, updated_at = NOW() WHERE id = $1",
        )
        .bind(claim_id)
        .bind(status)
        .bind(error_message)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("Claim", claim_id));
        }
        Ok(())
    }

    /// Inserts a denial row
    pub async fn insert_denial(&self, denial: &DenialRow) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO denials (
                id, claim_id, tenant_id, reason, denial_text,
                denied_amount, classification, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(denial.id)
        .bind(denial.claim_id)
        .bind(&denial.tenant_id)
        .bind(&denial.reason)
        .bind(&denial.denial_text)
        .bind(denial.denied_amount)
        .bind(&denial.classification)
        .bind(denial.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Retrieves every denial recorded for a claim, oldest first
    pub async fn find_denials_by_claim(&self, claim_id: Uuid) -> Result<Vec<DenialRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, DenialRow>(
            r#"
            SELECT id, claim_id, tenant_id, reason, denial_text,
                   denied_amount, classification, created_at
            FROM denials
            WHERE claim_id = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(claim_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

// ============================================================================
// Row types
// ============================================================================

/// Database row for a claim
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ClaimRow {
    pub id: Uuid,
    pub tenant_id: Option<String>,
    pub hospital_id: Option<String>,
    pub patient_id: Option<Uuid>,
    pub payer_id: Option<Uuid>,
    pub denial_id: Option<Uuid>,
    pub claim_number: Option<String>,
    pub claim_amount: Decimal,
    pub denied_amount: Decimal,
    pub recovered_amount: Decimal,
    pub status: String,
    pub original_filename: Option<String>,
    pub content_type: String,
    pub file_size: i64,
    pub storage_bucket: String,
    pub storage_key: String,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Columns written by a successful normalization
#[derive(Debug, Clone)]
pub struct ClaimNormalization {
    pub claim_number: Option<String>,
    pub patient_id: Uuid,
    pub payer_id: Uuid,
    pub denial_id: Uuid,
    pub claim_amount: Decimal,
}

/// Database row for a denial
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DenialRow {
    pub id: Uuid,
    pub claim_id: Uuid,
    pub tenant_id: String,
    pub reason: String,
    pub denial_text: String,
    pub denied_amount: Decimal,
    pub classification: Option<String>,
    pub created_at: DateTime<Utc>,
}
