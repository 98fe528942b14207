//! Repository implementations for domain entities
//!
//! This module provides concrete repository implementations that handle
//! database access for each table normalization touches. Repositories
//! encapsulate SQL queries and work in row types; the adapters map rows to
//! domain types.
//!
//! # Architecture
//!
//! Each repository follows these principles:
//! - Runtime-checked `query_as` with `sqlx::FromRow` rows
//! - Updates report a missing row as `DatabaseError::NotFound`
//! - No transactions span repositories; each write commits on its own

pub mod claims;
pub mod party;
pub mod agent_logs;

pub use claims::ClaimsRepository;
pub use party::PartyRepository;
pub use agent_logs::AgentLogRepository;
