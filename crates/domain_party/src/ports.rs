//! Party Domain Ports
//!
//! Patients and payers are looked up by tenant and name, and inserted when
//! missing. Neither port promises atomic find-or-create: the lookup and the
//! insert are separate calls, and no uniqueness constraint backs them.
//!
//! ```rust,ignore
//! let resolver = EntityResolver::new(
//!     Arc::new(PostgresPatientAdapter::new(pool.clone())),
//!     Arc::new(PostgresPayerAdapter::new(pool)),
//! );
//! ```

use async_trait::async_trait;

use core_kernel::{DomainPort, PortError, TenantId};

use crate::patient::Patient;
use crate::payer::Payer;

/// Access to patient records
#[async_trait]
pub trait PatientPort: DomainPort {
    /// Finds the first patient of `tenant_id` whose name equals `name`
    /// ignoring case, in a stable store-defined order
    async fn find_by_name(&self, tenant_id: &TenantId, name: &str) -> Result<Option<Patient>, PortError>;

    async fn insert_patient(&self, patient: &Patient) -> Result<(), PortError>;
}

/// Access to payer records
#[async_trait]
pub trait PayerPort: DomainPort {
    /// Finds the first payer of `tenant_id` whose name equals `name`
    /// ignoring case, in a stable store-defined order
    async fn find_by_name(&self, tenant_id: &TenantId, name: &str) -> Result<Option<Payer>, PortError>;

    async fn insert_payer(&self, payer: &Payer) -> Result<(), PortError>;
}

/// In-memory implementations for tests
///
/// Records are kept in insertion order, which is the stable order used to
/// pick among same-named duplicates.
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use tokio::sync::RwLock;

    fn same_name(a: &str, b: &str) -> bool {
        a.to_lowercase() == b.to_lowercase()
    }

    /// In-memory patient table
    #[derive(Debug, Default, Clone)]
    pub struct MockPatientPort {
        patients: Arc<RwLock<Vec<Patient>>>,
        unavailable: Arc<AtomicBool>,
    }

    impl MockPatientPort {
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-populates with patients
        pub async fn with_patients(patients: Vec<Patient>) -> Self {
            let port = Self::new();
            port.patients.write().await.extend(patients);
            port
        }

        /// Makes every call fail with a connection error
        pub fn set_unavailable(&self, unavailable: bool) {
            self.unavailable.store(unavailable, Ordering::SeqCst);
        }

        pub async fn patients(&self) -> Vec<Patient> {
            self.patients.read().await.clone()
        }

        fn check(&self) -> Result<(), PortError> {
            if self.unavailable.load(Ordering::SeqCst) {
                return Err(PortError::connection("patients table unavailable"));
            }
            Ok(())
        }
    }

    impl DomainPort for MockPatientPort {}

    #[async_trait]
    impl PatientPort for MockPatientPort {
        async fn find_by_name(&self, tenant_id: &TenantId, name: &str) -> Result<Option<Patient>, PortError> {
            self.check()?;
            Ok(self
                .patients
                .read()
                .await
                .iter()
                .find(|p| &p.tenant_id == tenant_id && same_name(&p.name, name))
                .cloned())
        }

        async fn insert_patient(&self, patient: &Patient) -> Result<(), PortError> {
            self.check()?;
            self.patients.write().await.push(patient.clone());
            Ok(())
        }
    }

    /// In-memory payer table
    #[derive(Debug, Default, Clone)]
    pub struct MockPayerPort {
        payers: Arc<RwLock<Vec<Payer>>>,
        unavailable: Arc<AtomicBool>,
    }

    impl MockPayerPort {
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-populates with payers
        pub async fn with_payers(payers: Vec<Payer>) -> Self {
            let port = Self::new();
            port.payers.write().await.extend(payers);
            port
        }

        /// Makes every call fail with a connection error
        pub fn set_unavailable(&self, unavailable: bool) {
            self.unavailable.store(unavailable, Ordering::SeqCst);
        }

        pub async fn payers(&self) -> Vec<Payer> {
            self.payers.read().await.clone()
        }

        fn check(&self) -> Result<(), PortError> {
            if self.unavailable.load(Ordering::SeqCst) {
                return Err(PortError::connection("payers table unavailable"));
            }
            Ok(())
        }
    }

    impl DomainPort for MockPayerPort {}

    #[async_trait]
    impl PayerPort for MockPayerPort {
        async fn find_by_name(&self, tenant_id: &TenantId, name: &str) -> Result<Option<Payer>, PortError> {
            self.check()?;
            Ok(self
                .payers
                .read()
                .await
                .iter()
                .find(|p| &p.tenant_id == tenant_id && same_name(&p.name, name))
                .cloned())
        }

        async fn insert_payer(&self, payer: &Payer) -> Result<(), PortError> {
            self.check()?;
            self.payers.write().await.push(payer.clone());
            Ok(())
        }
    }
}
