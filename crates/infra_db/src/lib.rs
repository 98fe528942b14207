//! Infrastructure Database Layer
//!
//! This crate provides the PostgreSQL persistence for claim normalization
//! using SQLx: claims, denials, patients, payers and the agent log.
//!
//! # Architecture
//!
//! The crate follows the repository pattern. Repositories speak in row
//! types; the adapters in [`adapters`] implement the domain ports on top of
//! them and translate errors into `PortError`.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{create_pool, run_migrations, DatabaseConfig};
//! use infra_db::adapters::PostgresClaimAdapter;
//!
//! let pool = create_pool(DatabaseConfig::new("postgres://localhost/claims")).await?;
//! run_migrations(&pool).await?;
//! let claims = PostgresClaimAdapter::new(pool);
//! ```

pub mod pool;
pub mod error;
pub mod repositories;
pub mod adapters;

pub use pool::{create_pool, run_migrations, DatabaseConfig, APPLICATION_NAME};
pub use error::DatabaseError;
pub use adapters::{
    PostgresAuditSink, PostgresClaimAdapter, PostgresPatientAdapter, PostgresPayerAdapter,
};
