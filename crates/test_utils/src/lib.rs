//! Test Utilities Crate
//!
//! Shared test infrastructure for the claim normalization workspace.
//!
//! # Modules
//!
//! - `fixtures`: Scopes and documents with known contents
//! - `builders`: Builders for claims, patients and payers
//! - `harness`: The pipeline wired to in-memory ports
//! - `database`: PostgreSQL testcontainer management
//! - `assertions`: Assertion helpers for outcomes and stored claims
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod harness;
pub mod database;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use harness::*;
pub use database::*;
pub use assertions::*;
pub use generators::*;
