//! Domain Adapters
//!
//! Adapter implementations for the domain ports, connecting them to the
//! PostgreSQL repositories.
//!
//! # Architecture
//!
//! Each adapter:
//! - Implements one or more domain port traits
//! - Translates between domain models and database row types
//! - Uses the repository layer for database operations
//!
//! | Adapter | Ports |
//! |---------|-------|
//! | [`PostgresClaimAdapter`] | `ClaimPort`, `DenialPort` |
//! | [`PostgresPatientAdapter`] | `PatientPort` |
//! | [`PostgresPayerAdapter`] | `PayerPort` |
//! | [`PostgresAuditSink`] | `AuditSink` |

pub mod audit;
pub mod claims;
pub mod party;

pub use audit::PostgresAuditSink;
pub use claims::PostgresClaimAdapter;
pub use party::{PostgresPatientAdapter, PostgresPayerAdapter};
