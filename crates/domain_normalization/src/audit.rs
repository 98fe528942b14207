//! Audit events written after each normalization run

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use core_kernel::{AuditEventId, ClaimId, TenantId};

/// Agent recorded on normalization events
pub const AGENT_TYPE: &str = "NORMALIZATION";

/// Action recorded on normalization events
pub const ACTION: &str = "DATA_NORMALIZATION";

/// Processing type recorded when extraction never ran
pub const UNKNOWN_PROCESSING_TYPE: &str = "unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditStatus {
    Success,
    Error,
}

impl AuditStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditStatus::Success => "SUCCESS",
            AuditStatus::Error => "ERROR",
        }
    }
}

impl fmt::Display for AuditStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the agent log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEvent {
    pub id: AuditEventId,
    pub claim_id: ClaimId,
    /// Absent when the claim could not be loaded and the request named none
    pub tenant_id: Option<TenantId>,
    pub timestamp: DateTime<Utc>,
    pub agent_type: String,
    pub action: String,
    pub status: AuditStatus,
    pub processing_type: String,
    /// Extractor summary, or an empty object
    pub summary: Value,
    pub error_message: Option<String>,
}

impl AuditEvent {
    /// Event for a claim that reached `DENIED`
    pub fn success(
        claim_id: ClaimId,
        tenant_id: Option<TenantId>,
        processing_type: impl Into<String>,
        summary: Value,
    ) -> Self {
        Self::new(claim_id, tenant_id, AuditStatus::Success, processing_type.into(), summary, None)
    }

    /// Event for a claim sent to manual review
    pub fn failure(
        claim_id: ClaimId,
        tenant_id: Option<TenantId>,
        processing_type: Option<String>,
        summary: Value,
        error_message: impl Into<String>,
    ) -> Self {
        Self::new(
            claim_id,
            tenant_id,
            AuditStatus::Error,
            processing_type.unwrap_or_else(|| UNKNOWN_PROCESSING_TYPE.to_string()),
            summary,
            Some(error_message.into()),
        )
    }

    fn new(
        claim_id: ClaimId,
        tenant_id: Option<TenantId>,
        status: AuditStatus,
        processing_type: String,
        summary: Value,
        error_message: Option<String>,
    ) -> Self {
        Self {
            id: AuditEventId::new_v7(),
            claim_id,
            tenant_id,
            timestamp: Utc::now(),
            agent_type: AGENT_TYPE.to_string(),
            action: ACTION.to_string(),
            status,
            processing_type,
            summary,
            error_message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_event() {
        let event = AuditEvent::success(
            ClaimId::new(),
            TenantId::parse("tenant-a"),
            "csv_parsed",
            json!({"total_rows": 1}),
        );
        assert_eq!(event.agent_type, AGENT_TYPE);
        assert_eq!(event.action, ACTION);
        assert_eq!(event.status, AuditStatus::Success);
        assert!(event.error_message.is_none());
    }

    #[test]
    fn test_failure_without_extraction() {
        let event = AuditEvent::failure(ClaimId::new(), None, None, json!({}), "Claim not found");
        assert_eq!(event.processing_type, UNKNOWN_PROCESSING_TYPE);
        assert_eq!(event.status.to_string(), "ERROR");
        assert_eq!(event.error_message.as_deref(), Some("Claim not found"));
    }
}
