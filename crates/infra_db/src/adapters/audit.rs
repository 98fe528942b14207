//! PostgreSQL Audit Sink
//!
//! Writes normalization audit events to the `agent_logs` table.

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::instrument;

use core_kernel::{DomainPort, HealthCheckResult, HealthCheckable, PortError};
use domain_normalization::{AuditEvent, AuditSink};

use super::party::ping;
use crate::repositories::agent_logs::{AgentLogRepository, AgentLogRow};

/// PostgreSQL-backed implementation of `AuditSink`
#[derive(Debug, Clone)]
pub struct PostgresAuditSink {
    repository: AgentLogRepository,
    pool: PgPool,
}

impl PostgresAuditSink {
    /// Creates a new audit sink
    ///
    /// # Arguments
    ///
    /// * `pool` - The PostgreSQL connection pool
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: AgentLogRepository::new(pool.clone()),
            pool,
        }
    }

    /// Returns a reference to the underlying repository
    pub fn repository(&self) -> &AgentLogRepository {
        &self.repository
    }
}

impl DomainPort for PostgresAuditSink {}

#[async_trait]
impl HealthCheckable for PostgresAuditSink {
    async fn health_check(&self) -> HealthCheckResult {
        ping(&self.pool, "postgres-audit-sink").await
    }
}

#[async_trait]
impl AuditSink for PostgresAuditSink {
    #[instrument(skip(self, event), fields(claim_id = %event.claim_id, status = %event.status))]
    async fn append(&self, event: &AuditEvent) -> Result<(), PortError> {
        self.repository.insert(&event_to_row(event)).await?;
        Ok(())
    }
}

/// Converts an audit event to an agent log row
pub fn event_to_row(event: &AuditEvent) -> AgentLogRow {
    AgentLogRow {
        id: *event.id.as_uuid(),
        claim_id: *event.claim_id.as_uuid(),
        tenant_id: event.tenant_id.as_ref().map(|t| t.as_str().to_string()),
        logged_at: event.timestamp,
        agent_type: event.agent_type.clone(),
        action: event.action.clone(),
        status: event.status.as_str().to_string(),
        processing_type: event.processing_type.clone(),
        summary: Json(event.summary.clone()),
        error_message: event.error_message.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::{ClaimId, TenantId};
    use serde_json::json;

    #[test]
    fn test_failure_event_row() {
        let event = AuditEvent::failure(ClaimId::new(), None, None, json!({}), "Claim not found");
        let row = event_to_row(&event);

        assert_eq!(row.status, "ERROR");
        assert_eq!(row.processing_type, "unknown");
        assert_eq!(row.agent_type, "NORMALIZATION");
        assert_eq!(row.action, "DATA_NORMALIZATION");
        assert!(row.tenant_id.is_none());
        assert_eq!(row.error_message.as_deref(), Some("Claim not found"));
    }

    #[test]
    fn test_success_event_keeps_summary() {
        let summary = json!({"total_rows": 2, "fields_extracted": 4});
        let event = AuditEvent::success(ClaimId::new(), TenantId::parse("tenant-a"), "csv_parsed", summary.clone());
        let row = event_to_row(&event);

        assert_eq!(row.status, "SUCCESS");
        assert_eq!(row.tenant_id.as_deref(), Some("tenant-a"));
        assert_eq!(row.summary.0, summary);
    }
}
