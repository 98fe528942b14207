//! Party Domain
//!
//! Patients and payers referenced by uploaded claims. Both are scoped to a
//! tenant and resolved by name: the first claim that mentions "Jane Roe"
//! creates the patient, later claims of the same tenant link to it whatever
//! the capitalization.
//!
//! # Examples
//!
//! ```rust,ignore
//! use domain_party::EntityResolver;
//!
//! let resolver = EntityResolver::new(patients, payers);
//! let patient_id = resolver
//!     .resolve_patient(&tenant_id, &hospital_id, Some("Jane Roe"))
//!     .await?;
//! ```

pub mod patient;
pub mod payer;
pub mod resolver;
pub mod ports;
pub mod error;

pub use patient::{Patient, UNKNOWN_PATIENT};
pub use payer::{Payer, PayerType, UNKNOWN_PAYER};
pub use resolver::EntityResolver;
pub use ports::{PatientPort, PayerPort};
#[cfg(any(test, feature = "mock"))]
pub use ports::mock::{MockPatientPort, MockPayerPort};
pub use error::PartyError;
