//! Patients named on claim documents

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{HospitalId, PatientId, TenantId};

/// Name used when a document did not identify the patient
pub const UNKNOWN_PATIENT: &str = "Unknown Patient";

/// A patient known to a tenant
///
/// Patients are deduplicated by case-insensitive name within a tenant; two
/// tenants with a patient of the same name hold two separate records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    pub id: PatientId,
    pub tenant_id: TenantId,
    /// Hospital of the claim that first mentioned the patient
    pub hospital_id: HospitalId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Patient {
    pub fn new(tenant_id: TenantId, hospital_id: HospitalId, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: PatientId::new_v7(),
            tenant_id,
            hospital_id,
            name: name.into(),
            created_at: now,
            updated_at: now,
        }
    }
}
