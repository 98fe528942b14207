//! Tenant-scoped find-or-create for patients and payers
//!
//! Resolution looks up an existing record by case-insensitive name within the
//! tenant and inserts a new one when nothing matches. It always yields an
//! identifier: a missing name resolves to the shared placeholder record
//! (`Unknown Patient` / `Unknown Payer`) instead of failing the claim.
//!
//! Lookup and insert are separate store calls. Two invocations resolving the
//! same unseen name at the same time can both miss and both insert, leaving
//! two records with that name; later lookups then return the first of them.

use std::sync::Arc;
use tracing::{debug, info, instrument};

use core_kernel::{HospitalId, PatientId, PayerId, TenantId};

use crate::error::PartyError;
use crate::patient::{Patient, UNKNOWN_PATIENT};
use crate::payer::{Payer, UNKNOWN_PAYER};
use crate::ports::{PatientPort, PayerPort};

/// Resolves patient and payer names to entity identifiers
#[derive(Clone)]
pub struct EntityResolver {
    patients: Arc<dyn PatientPort>,
    payers: Arc<dyn PayerPort>,
}

impl EntityResolver {
    pub fn new(patients: Arc<dyn PatientPort>, payers: Arc<dyn PayerPort>) -> Self {
        Self { patients, payers }
    }

    /// Returns the patient id for `candidate_name` within the tenant,
    /// creating the patient under `hospital_id` if it does not exist yet
    #[instrument(skip(self), fields(tenant_id = %tenant_id))]
    pub async fn resolve_patient(
        &self,
        tenant_id: &TenantId,
        hospital_id: &HospitalId,
        candidate_name: Option<&str>,
    ) -> Result<PatientId, PartyError> {
        let name = candidate_or(candidate_name, UNKNOWN_PATIENT);

        let existing = self
            .patients
            .find_by_name(tenant_id, name)
            .await
            .map_err(|e| PartyError::persistence("patient", e))?;
        if let Some(patient) = existing {
            debug!(patient_id = %patient.id, "Resolved existing patient");
            return Ok(patient.id);
        }

        let patient = Patient::new(tenant_id.clone(), hospital_id.clone(), name);
        self.patients
            .insert_patient(&patient)
            .await
            .map_err(|e| PartyError::persistence("patient", e))?;

        info!(patient_id = %patient.id, "Created patient");
        Ok(patient.id)
    }

    /// Returns the payer id for `candidate_name` within the tenant, creating
    /// a third-party-administrator payer if it does not exist yet
    #[instrument(skip(self), fields(tenant_id = %tenant_id))]
    pub async fn resolve_payer(
        &self,
        tenant_id: &TenantId,
        candidate_name: Option<&str>,
    ) -> Result<PayerId, PartyError> {
        let name = candidate_or(candidate_name, UNKNOWN_PAYER);

        let existing = self
            .payers
            .find_by_name(tenant_id, name)
            .await
            .map_err(|e| PartyError::persistence("payer", e))?;
        if let Some(payer) = existing {
            debug!(payer_id = %payer.id, "Resolved existing payer");
            return Ok(payer.id);
        }

        let payer = Payer::new(tenant_id.clone(), name);
        self.payers
            .insert_payer(&payer)
            .await
            .map_err(|e| PartyError::persistence("payer", e))?;

        info!(payer_id = %payer.id, "Created payer");
        Ok(payer.id)
    }
}

fn candidate_or<'a>(candidate: Option<&'a str>, placeholder: &'a str) -> &'a str {
    candidate
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or(placeholder)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::mock::{MockPatientPort, MockPayerPort};
    use async_trait::async_trait;
    use core_kernel::{DomainPort, PortError};
    use tokio::sync::Barrier;

    fn tenant(name: &str) -> TenantId {
        TenantId::parse(name).unwrap()
    }

    fn hospital() -> HospitalId {
        HospitalId::parse("hosp-1").unwrap()
    }

    fn resolver() -> (EntityResolver, MockPatientPort, MockPayerPort) {
        let patients = MockPatientPort::new();
        let payers = MockPayerPort::new();
        let resolver = EntityResolver::new(Arc::new(patients.clone()), Arc::new(payers.clone()));
        (resolver, patients, payers)
    }

    #[tokio::test]
    async fn test_resolution_is_idempotent() {
        let (resolver, patients, _) = resolver();
        let a = tenant("tenant-a");

        let first = resolver.resolve_patient(&a, &hospital(), Some("John Doe")).await.unwrap();
        let second = resolver.resolve_patient(&a, &hospital(), Some("John Doe")).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(patients.patients().await.len(), 1);
    }

    #[tokio::test]
    async fn test_tenants_are_isolated() {
        let (resolver, patients, _) = resolver();

        let in_a = resolver.resolve_patient(&tenant("tenant-a"), &hospital(), Some("John Doe")).await.unwrap();
        let in_b = resolver.resolve_patient(&tenant("tenant-b"), &hospital(), Some("John Doe")).await.unwrap();

        assert_ne!(in_a, in_b);
        let stored = patients.patients().await;
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].tenant_id, tenant("tenant-a"));
        assert_eq!(stored[1].tenant_id, tenant("tenant-b"));
    }

    #[tokio::test]
    async fn test_name_match_ignores_case() {
        let (resolver, _, _) = resolver();
        let a = tenant("tenant-a");

        let created = resolver.resolve_patient(&a, &hospital(), Some("John Doe")).await.unwrap();
        let lower = resolver.resolve_patient(&a, &hospital(), Some("john doe")).await.unwrap();
        let upper = resolver.resolve_patient(&a, &hospital(), Some("JOHN DOE")).await.unwrap();

        assert_eq!(created, lower);
        assert_eq!(created, upper);
    }

    #[tokio::test]
    async fn test_missing_names_use_placeholders() {
        let (resolver, patients, payers) = resolver();
        let a = tenant("tenant-a");

        let patient = resolver.resolve_patient(&a, &hospital(), None).await.unwrap();
        let again = resolver.resolve_patient(&a, &hospital(), Some("   ")).await.unwrap();
        resolver.resolve_payer(&a, None).await.unwrap();

        assert_eq!(patient, again);
        assert_eq!(patients.patients().await[0].name, UNKNOWN_PATIENT);
        assert_eq!(payers.payers().await[0].name, UNKNOWN_PAYER);
    }

    #[tokio::test]
    async fn test_patient_keeps_hospital_and_payer_is_tpa() {
        let (resolver, patients, payers) = resolver();
        let a = tenant("tenant-a");

        resolver.resolve_patient(&a, &hospital(), Some("Jane Roe")).await.unwrap();
        resolver.resolve_payer(&a, Some("Apollo Hospital")).await.unwrap();

        assert_eq!(patients.patients().await[0].hospital_id, hospital());
        assert_eq!(payers.payers().await[0].payer_type, crate::payer::PayerType::Tpa);
    }

    #[tokio::test]
    async fn test_first_of_duplicates_wins() {
        let a = tenant("tenant-a");
        let older = Patient::new(a.clone(), hospital(), "John Doe");
        let newer = Patient::new(a.clone(), hospital(), "john doe");
        let patients = MockPatientPort::with_patients(vec![older.clone(), newer]).await;
        let resolver = EntityResolver::new(Arc::new(patients), Arc::new(MockPayerPort::new()));

        let id = resolver.resolve_patient(&a, &hospital(), Some("JOHN DOE")).await.unwrap();
        assert_eq!(id, older.id);
    }

    #[tokio::test]
    async fn test_store_failure_is_persistence_error() {
        let (resolver, _, payers) = resolver();
        payers.set_unavailable(true);

        let err = resolver.resolve_payer(&tenant("tenant-a"), Some("X")).await.unwrap_err();
        assert!(matches!(err, PartyError::Persistence { entity: "payer", .. }));
    }

    /// Holds each lookup until every barrier party has finished its own
    struct InterleavedPatientPort {
        inner: MockPatientPort,
        barrier: Barrier,
    }

    impl DomainPort for InterleavedPatientPort {}

    #[async_trait]
    impl PatientPort for InterleavedPatientPort {
        async fn find_by_name(&self, tenant_id: &TenantId, name: &str) -> Result<Option<Patient>, PortError> {
            let found = self.inner.find_by_name(tenant_id, name).await;
            self.barrier.wait().await;
            found
        }

        async fn insert_patient(&self, patient: &Patient) -> Result<(), PortError> {
            self.inner.insert_patient(patient).await
        }
    }

    #[tokio::test]
    async fn test_concurrent_first_resolution_can_create_duplicates() {
        let inner = MockPatientPort::new();
        let port = Arc::new(InterleavedPatientPort {
            inner: inner.clone(),
            barrier: Barrier::new(2),
        });
        let resolver = EntityResolver::new(port, Arc::new(MockPayerPort::new()));
        let a = tenant("tenant-a");
        let h = hospital();

        let (first, second) = tokio::join!(
            resolver.resolve_patient(&a, &h, Some("New Patient")),
            resolver.resolve_patient(&a, &h, Some("new patient")),
        );

        assert_ne!(first.unwrap(), second.unwrap());
        assert_eq!(inner.patients().await.len(), 2);
    }
}
