//! PostgreSQL Party Adapter
//!
//! This module provides the database adapters for the patient and payer
//! ports, built on `PartyRepository`.
//!
//! # Overview
//!
//! Both adapters share one repository and one pool. They:
//!
//! - Translate port calls into repository operations
//! - Convert database row types back to domain models
//! - Translate `DatabaseError` into `PortError`
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::adapters::{PostgresPatientAdapter, PostgresPayerAdapter};
//! use domain_party::EntityResolver;
//! use std::sync::Arc;
//!
//! let resolver = EntityResolver::new(
//!     Arc::new(PostgresPatientAdapter::new(pool.clone())),
//!     Arc::new(PostgresPayerAdapter::new(pool)),
//! );
//! ```

use async_trait::async_trait;
use sqlx::PgPool;
use std::str::FromStr;
use std::time::Instant;
use tracing::{debug, instrument};

use core_kernel::{DomainPort, HealthCheckResult, HealthCheckable, HospitalId, PortError, TenantId};
use domain_party::{Patient, PatientPort, Payer, PayerPort, PayerType};

use crate::repositories::party::{PartyRepository, PatientRow, PayerRow};

/// PostgreSQL-backed implementation of `PatientPort`
#[derive(Debug, Clone)]
pub struct PostgresPatientAdapter {
    repository: PartyRepository,
    pool: PgPool,
}

impl PostgresPatientAdapter {
    /// Creates a new PostgreSQL patient adapter
    ///
    /// # Arguments
    ///
    /// * `pool` - The PostgreSQL connection pool
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: PartyRepository::new(pool.clone()),
            pool,
        }
    }

    /// Returns a reference to the underlying repository
    pub fn repository(&self) -> &PartyRepository {
        &self.repository
    }
}

impl DomainPort for PostgresPatientAdapter {}

#[async_trait]
impl HealthCheckable for PostgresPatientAdapter {
    async fn health_check(&self) -> HealthCheckResult {
        ping(&self.pool, "postgres-patient-adapter").await
    }
}

#[async_trait]
impl PatientPort for PostgresPatientAdapter {
    #[instrument(skip(self), fields(tenant_id = %tenant_id))]
    async fn find_by_name(&self, tenant_id: &TenantId, name: &str) -> Result<Option<Patient>, PortError> {
        let row = self.repository.find_patient_by_name(tenant_id.as_str(), name).await?;
        debug!(found = row.is_some(), "Patient lookup");
        row.map(row_to_patient).transpose()
    }

    #[instrument(skip(self, patient), fields(patient_id = %patient.id))]
    async fn insert_patient(&self, patient: &Patient) -> Result<(), PortError> {
        self.repository.insert_patient(&patient_to_row(patient)).await?;
        Ok(())
    }
}

/// PostgreSQL-backed implementation of `PayerPort`
#[derive(Debug, Clone)]
pub struct PostgresPayerAdapter {
    repository: PartyRepository,
    pool: PgPool,
}

impl PostgresPayerAdapter {
    /// Creates a new PostgreSQL payer adapter
    ///
    /// # Arguments
    ///
    /// * `pool` - The PostgreSQL connection pool
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: PartyRepository::new(pool.clone()),
            pool,
        }
    }
}

impl DomainPort for PostgresPayerAdapter {}

#[async_trait]
impl HealthCheckable for PostgresPayerAdapter {
    async fn health_check(&self) -> HealthCheckResult {
        ping(&self.pool, "postgres-payer-adapter").await
    }
}

#[async_trait]
impl PayerPort for PostgresPayerAdapter {
    #[instrument(skip(self), fields(tenant_id = %tenant_id))]
    async fn find_by_name(&self, tenant_id: &TenantId, name: &str) -> Result<Option<Payer>, PortError> {
        let row = self.repository.find_payer_by_name(tenant_id.as_str(), name).await?;
        debug!(found = row.is_some(), "Payer lookup");
        row.map(row_to_payer).transpose()
    }

    #[instrument(skip(self, payer), fields(payer_id = %payer.id))]
    async fn insert_payer(&self, payer: &Payer) -> Result<(), PortError> {
        self.repository.insert_payer(&payer_to_row(payer)).await?;
        Ok(())
    }
}

/// Runs `SELECT 1` on the pool
pub(crate) async fn ping(pool: &PgPool, adapter_id: &str) -> HealthCheckResult {
    let started = Instant::now();
    let probe = sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(pool)
        .await
        .map(|_| ())
        .map_err(|e| format!("Database error: {}", e));
    HealthCheckResult::from_probe(adapter_id, started, probe)
}

// ============================================================================
// Conversion Functions
// ============================================================================

fn scope<T>(parsed: Option<T>, column: &str, value: &str) -> Result<T, PortError> {
    parsed.ok_or_else(|| PortError::transformation(format!("blank {} '{}'", column, value)))
}

/// Converts a database patient row to a domain Patient
pub fn row_to_patient(row: PatientRow) -> Result<Patient, PortError> {
    Ok(Patient {
        id: row.id.into(),
        tenant_id: scope(TenantId::parse(&row.tenant_id), "tenant_id", &row.tenant_id)?,
        hospital_id: scope(HospitalId::parse(&row.hospital_id), "hospital_id", &row.hospital_id)?,
        name: row.name,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

/// Converts a domain Patient to a database row
pub fn patient_to_row(patient: &Patient) -> PatientRow {
    PatientRow {
        id: *patient.id.as_uuid(),
        tenant_id: patient.tenant_id.as_str().to_string(),
        hospital_id: patient.hospital_id.as_str().to_string(),
        name: patient.name.clone(),
        created_at: patient.created_at,
        updated_at: patient.updated_at,
    }
}

/// Converts a database payer row to a domain Payer
pub fn row_to_payer(row: PayerRow) -> Result<Payer, PortError> {
    let payer_type = PayerType::from_str(&row.payer_type)
        .map_err(|e| PortError::transformation(format!("payer {}: {}", row.id, e)))?;

    Ok(Payer {
        id: row.id.into(),
        tenant_id: scope(TenantId::parse(&row.tenant_id), "tenant_id", &row.tenant_id)?,
        name: row.name,
        payer_type,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

/// Converts a domain Payer to a database row
pub fn payer_to_row(payer: &Payer) -> PayerRow {
    PayerRow {
        id: *payer.id.as_uuid(),
        tenant_id: payer.tenant_id.as_str().to_string(),
        name: payer.name.clone(),
        payer_type: payer.payer_type.as_str().to_string(),
        created_at: payer.created_at,
        updated_at: payer.updated_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tenant() -> TenantId {
        TenantId::parse("tenant-a").unwrap()
    }

    #[test]
    fn test_patient_row_round_trip() {
        let patient = Patient::new(tenant(), HospitalId::parse("hosp-1").unwrap(), "Jane Doe");
        let back = row_to_patient(patient_to_row(&patient)).unwrap();
        assert_eq!(back, patient);
    }

    #[test]
    fn test_payer_type_stored_as_text() {
        let payer = Payer::new(tenant(), "Star Health");
        let row = payer_to_row(&payer);
        assert_eq!(row.payer_type, "TPA");
        assert_eq!(row_to_payer(row).unwrap(), payer);
    }

    #[test]
    fn test_unknown_payer_type_is_transformation_error() {
        let mut row = payer_to_row(&Payer::new(tenant(), "Star Health"));
        row.payer_type = "BROKER".to_string();
        assert!(matches!(row_to_payer(row), Err(PortError::Transformation { .. })));
    }

    #[test]
    fn test_blank_tenant_is_rejected() {
        let mut row = patient_to_row(&Patient::new(tenant(), HospitalId::parse("h").unwrap(), "A"));
        row.tenant_id = " ".to_string();
        assert!(row_to_patient(row).is_err());
    }
}
