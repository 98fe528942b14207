//! Party repository implementation
//!
//! This module provides database access for the patients and payers that
//! normalization resolves claims against.
//!
//! # Name Lookup
//!
//! Lookups compare `LOWER(name)` within a tenant and return the oldest
//! matching row (`ORDER BY created_at, id`). There is no uniqueness
//! constraint on names, so concurrent inserts of the same new name both
//! succeed; the ordering keeps later lookups deterministic.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::DatabaseError;

/// Repository for patient and payer rows
#[derive(Debug, Clone)]
pub struct PartyRepository {
    pool: PgPool,
}

impl PartyRepository {
    /// Creates a new PartyRepository with the given connection pool
    ///
    /// # Arguments
    ///
    /// * `pool` - The PostgreSQL connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Finds the oldest patient of a tenant with the given name, ignoring case
    ///
    /// # Arguments
    ///
    /// * `tenant_id` - Owning tenant
    /// * `name` - Name to match
    pub async fn find_patient_by_name(&self, tenant_id: &str, name: &str) -> Result<Option<PatientRow>, DatabaseError> {
        let row = sqlx::query_as::<_, PatientRow>(
            r#"
            SELECT id, tenant_id, hospital_id, name, created_at, updated_at
            FROM patients
            WHERE tenant_id = $1 AND LOWER(name) = LOWER($2)
            ORDER BY created_at, id
            LIMIT 1
            "#,
        )
        .bind(tenant_id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Inserts a patient row
    pub async fn insert_patient(&self, patient: &PatientRow) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO patients (id, tenant_id, hospital_id, name, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(patient.id)
        .bind(&patient.tenant_id)
        .bind(&patient.hospital_id)
        .bind(&patient.name)
        .bind(patient.created_at)
        .bind(patient.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Finds the oldest payer of a tenant with the given name, ignoring case
    ///
    /// # Arguments
    ///
    /// * `tenant_id` - Owning tenant
    /// * `name` - Name to match
    pub async fn find_payer_by_name(&self, tenant_id: &str, name: &str) -> Result<Option<PayerRow>, DatabaseError> {
        let row = sqlx::query_as::<_, PayerRow>(
            r#"
            SELECT id, tenant_id, name, payer_type, created_at, updated_at
            FROM payers
            WHERE tenant_id = $1 AND LOWER(name) = LOWER($2)
            ORDER BY created_at, id
            LIMIT 1
            "#,
        )
        .bind(tenant_id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Inserts a payer row
    pub async fn insert_payer(&self, payer: &PayerRow) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO payers (id, tenant_id, name, payer_type, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(payer.id)
        .bind(&payer.tenant_id)
        .bind(&payer.name)
        .bind(&payer.payer_type)
        .bind(payer.created_at)
        .bind(payer.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Counts patients of a tenant with the given name, ignoring case
    pub async fn count_patients_named(&self, tenant_id: &str, name: &str) -> Result<i64, DatabaseError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM patients WHERE tenant_id = $1 AND LOWER(name) = LOWER($2)",
        )
        .bind(tenant_id)
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}

// ============================================================================
// Row types
// ============================================================================

/// Database row for a patient
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PatientRow {
    pub id: Uuid,
    pub tenant_id: String,
    pub hospital_id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Database row for a payer
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PayerRow {
    pub id: Uuid,
    pub tenant_id: String,
    pub name: String,
    pub payer_type: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
