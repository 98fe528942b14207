//! Core Kernel - Foundational types for the claim normalization system
//!
//! This crate provides the building blocks shared by every other crate:
//! - Strongly-typed identifiers for claims and the entities resolved from them
//! - Tenant scoping value objects
//! - Lenient monetary amount parsing for document-extracted values
//! - The port vocabulary (`PortError`, `DomainPort`, health checks) used by
//!   every collaborator interface

pub mod money;
pub mod identifiers;
pub mod tenancy;
pub mod ports;
pub mod error;

pub use money::{parse_optional_amount, try_parse_amount, MoneyError};
pub use identifiers::{ClaimId, PatientId, PayerId, DenialId, AuditEventId};
pub use tenancy::{TenantId, HospitalId};
pub use ports::{
    PortError, DomainPort, HealthCheckable, HealthCheckResult, AdapterHealth,
};
pub use error::CoreError;
