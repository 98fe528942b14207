//! Ports and Adapters Infrastructure
//!
//! Every collaborator the normalization pipeline talks to (claim store,
//! entity tables, object store, text detection, audit sink) is reached
//! through a port trait defined in a domain crate. This module holds the
//! shared vocabulary for those traits.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │            NormalizationPipeline             │
//! └──────────────────────────────────────────────┘
//!                       │
//!                       ▼
//! ┌──────────────────────────────────────────────┐
//! │  Port traits (ClaimPort, PatientPort,        │
//! │  ObjectStore, TextDetector, AuditSink, ...)  │
//! └──────────────────────────────────────────────┘
//!          ▲                        ▲
//!   ┌──────┴───────┐       ┌────────┴────────┐
//!   │  infra_db    │       │ infra_external  │
//!   │ (PostgreSQL) │       │ (files, HTTP)   │
//!   └──────────────┘       └─────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};
use thiserror::Error;

type BoxedSource = Box<dyn std::error::Error + Send + Sync>;

/// Failure reported by any adapter
///
/// The pipeline only needs to tell a missing record from a rejected input
/// from an unreachable backend; the variants carry enough text for the
/// claim's error message and nothing backend-specific.
#[derive(Debug, Error)]
pub enum PortError {
    #[error("Not found: {entity_type} with id {id}")]
    NotFound { entity_type: String, id: String },

    /// The adapter refused the input before reaching the backend
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// A write collided with existing rows
    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Connection error: {message}")]
    Connection {
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },

    #[error("Timeout after {duration_ms}ms: {operation}")]
    Timeout { operation: String, duration_ms: u64 },

    /// The backend answered but is refusing work (overload, maintenance)
    #[error("Service unavailable: {service}")]
    ServiceUnavailable { service: String },

    /// Stored or received data could not be mapped onto domain types
    #[error("Transformation error: {message}")]
    Transformation { message: String },

    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },
}

impl PortError {
    pub fn not_found(entity_type: impl Into<String>, id: impl fmt::Display) -> Self {
        PortError::NotFound {
            entity_type: entity_type.into(),
            id: id.to_string(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        PortError::Validation { message: message.into() }
    }

    pub fn connection(message: impl Into<String>) -> Self {
        PortError::Connection {
            message: message.into(),
            source: None,
        }
    }

    /// An operation that ran past `budget`
    pub fn timeout(operation: impl Into<String>, budget: Duration) -> Self {
        PortError::Timeout {
            operation: operation.into(),
            duration_ms: budget.as_millis() as u64,
        }
    }

    pub fn transformation(message: impl Into<String>) -> Self {
        PortError::Transformation { message: message.into() }
    }

    /// True when the same call may succeed later without any data change
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            PortError::Connection { .. } | PortError::Timeout { .. } | PortError::ServiceUnavailable { .. }
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, PortError::NotFound { .. })
    }
}

/// Marker trait for all domain ports
///
/// One adapter instance serves every concurrent normalization run.
pub trait DomainPort: Send + Sync + 'static {}

/// Health status for an adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdapterHealth {
    Healthy,
    Unhealthy,
}

/// Result of one readiness probe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheckResult {
    pub adapter_id: String,
    pub status: AdapterHealth,
    pub latency_ms: u64,
    /// Why the adapter is unhealthy
    pub message: Option<String>,
    pub checked_at: DateTime<Utc>,
}

impl HealthCheckResult {
    /// Builds a result from a probe that started at `started`
    ///
    /// An `Err` carries the message shown on the readiness endpoint.
    pub fn from_probe(adapter_id: impl Into<String>, started: Instant, probe: Result<(), String>) -> Self {
        let (status, message) = match probe {
            Ok(()) => (AdapterHealth::Healthy, None),
            Err(message) => (AdapterHealth::Unhealthy, Some(message)),
        };
        Self {
            adapter_id: adapter_id.into(),
            status,
            latency_ms: started.elapsed().as_millis() as u64,
            message,
            checked_at: Utc::now(),
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status == AdapterHealth::Healthy
    }
}

/// Adapters probed by the readiness endpoint
#[async_trait::async_trait]
pub trait HealthCheckable: Send + Sync {
    async fn health_check(&self) -> HealthCheckResult;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_names_entity_and_id() {
        let error = PortError::not_found("Claim", "123");
        assert!(error.is_not_found());
        assert!(!error.is_transient());
        assert_eq!(error.to_string(), "Not found: Claim with id 123");
    }

    #[test]
    fn test_transient_classification() {
        let timeout = PortError::timeout("object store read", Duration::from_secs(5));
        assert!(timeout.is_transient());
        assert!(timeout.to_string().contains("5000ms"));

        let unavailable = PortError::ServiceUnavailable {
            service: "text detection".to_string(),
        };
        assert!(unavailable.is_transient());

        assert!(!PortError::validation("empty key").is_transient());
        assert!(!PortError::transformation("bad status").is_transient());
    }

    #[test]
    fn test_probe_result() {
        let ok = HealthCheckResult::from_probe("claims-db", Instant::now(), Ok(()));
        assert!(ok.is_healthy());
        assert!(ok.message.is_none());

        let failed = HealthCheckResult::from_probe("claims-db", Instant::now(), Err("refused".to_string()));
        assert_eq!(failed.status, AdapterHealth::Unhealthy);
        assert_eq!(failed.message.as_deref(), Some("refused"));
    }

    #[test]
    fn test_health_serializes_snake_case() {
        let json = serde_json::to_string(&AdapterHealth::Unhealthy).unwrap();
        assert_eq!(json, "\"unhealthy\"");
    }
}
