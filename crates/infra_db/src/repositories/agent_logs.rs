//! Agent log repository implementation
//!
//! Every normalization run appends one row here, on success and on failure.

use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::DatabaseError;

/// Repository for the append-only agent log
#[derive(Debug, Clone)]
pub struct AgentLogRepository {
    pool: PgPool,
}

impl AgentLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Appends one log row
    pub async fn insert(&self, entry: &AgentLogRow) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO agent_logs (
                id, claim_id, tenant_id, logged_at, agent_type, action,
                status, processing_type, summary, error_message
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(entry.id)
        .bind(entry.claim_id)
        .bind(&entry.tenant_id)
        .bind(entry.logged_at)
        .bind(&entry.agent_type)
        .bind(&entry.action)
        .bind(&entry.status)
        .bind(&entry.processing_type)
        .bind(&entry.summary)
        .bind(&entry.error_message)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Retrieves the log of a claim, oldest first
    pub async fn find_by_claim(&self, claim_id: Uuid) -> Result<Vec<AgentLogRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, AgentLogRow>(
            r#"
            SELECT id, claim_id, tenant_id, logged_at, agent_type, action,
                   status, processing_type, summary, error_message
            FROM agent_logs
            WHERE claim_id = $1
            ORDER BY logged_at, id
            "#,
        )
        .bind(claim_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

/// Database row for an agent log entry
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AgentLogRow {
    pub id: Uuid,
    pub claim_id: Uuid,
    pub tenant_id: Option<String>,
    pub logged_at: DateTime<Utc>,
    pub agent_type: String,
    pub action: String,
    pub status: String,
    pub processing_type: String,
    pub summary: Json<Value>,
    pub error_message: Option<String>,
}
