//! Denial records
//!
//! A denial is created fresh on every normalization run that reaches entity
//! creation. Denials are never deduplicated, so a retried claim accumulates
//! one row per attempt; the claim links only the latest.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use core_kernel::{ClaimId, DenialId, TenantId};

use crate::amount::amount_or_zero;
use crate::error::ClaimError;
use crate::ports::DenialPort;

/// Reason recorded when the document did not state one
pub const UNSPECIFIED_REASON: &str = "Reason not specified";

/// A payer's denial of a claim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Denial {
    pub id: DenialId,
    /// Claim that produced this denial (not owning)
    pub claim_id: ClaimId,
    pub tenant_id: TenantId,
    /// Short reason code or text
    pub reason: String,
    /// Free-text reason as it appeared in the document
    pub denial_text: String,
    pub denied_amount: Decimal,
    /// Structured category assigned by later analysis
    pub classification: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Denial {
    pub fn new(
        claim_id: ClaimId,
        tenant_id: TenantId,
        reason: impl Into<String>,
        denied_amount: Decimal,
    ) -> Self {
        let reason = reason.into();
        Self {
            id: DenialId::new_v7(),
            claim_id,
            tenant_id,
            denial_text: reason.clone(),
            reason,
            denied_amount,
            classification: None,
            created_at: Utc::now(),
        }
    }
}

/// Creates denial records from extracted fields
#[derive(Clone)]
pub struct DenialCreator {
    denials: Arc<dyn DenialPort>,
}

impl DenialCreator {
    pub fn new(denials: Arc<dyn DenialPort>) -> Self {
        Self { denials }
    }

    /// Persists a new denial and returns its identifier
    ///
    /// A missing reason becomes [`UNSPECIFIED_REASON`]; an unreadable amount
    /// becomes zero. Only the store write can fail.
    pub async fn create_denial(
        &self,
        claim_id: ClaimId,
        tenant_id: &TenantId,
        reason_text: Option<&str>,
        denied_amount_raw: Option<&str>,
    ) -> Result<DenialId, ClaimError> {
        let reason = reason_text
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .unwrap_or(UNSPECIFIED_REASON);

        let denied_amount = amount_or_zero(claim_id, "denied_amount", denied_amount_raw);

        let denial = Denial::new(claim_id, tenant_id.clone(), reason, denied_amount);
        self.denials
            .insert_denial(&denial)
            .await
            .map_err(|e| ClaimError::persistence("denial", e))?;

        debug!(claim_id = %claim_id, denial_id = %denial.id, "Denial created");
        Ok(denial.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use crate::ports::mock::{ClaimOperation, MockClaimPort};

    fn tenant() -> TenantId {
        TenantId::parse("tenant-a").unwrap()
    }

    #[tokio::test]
    async fn test_creates_denial_with_parsed_amount() {
        let port = MockClaimPort::new();
        let creator = DenialCreator::new(Arc::new(port.clone()));
        let claim_id = ClaimId::new();

        let id = creator
            .create_denial(claim_id, &tenant(), Some("not medically necessary"), Some("₹ 12,345.00"))
            .await
            .unwrap();

        let denials = port.denials().await;
        assert_eq!(denials.len(), 1);
        assert_eq!(denials[0].id, id);
        assert_eq!(denials[0].claim_id, claim_id);
        assert_eq!(denials[0].denied_amount, dec!(12345.00));
        assert_eq!(denials[0].reason, "not medically necessary");
        assert_eq!(denials[0].denial_text, denials[0].reason);
    }

    #[tokio::test]
    async fn test_defaults_reason_and_amount() {
        let port = MockClaimPort::new();
        let creator = DenialCreator::new(Arc::new(port.clone()));

        creator
            .create_denial(ClaimId::new(), &tenant(), None, Some("not-a-number"))
            .await
            .unwrap();

        let denial = &port.denials().await[0];
        assert_eq!(denial.reason, UNSPECIFIED_REASON);
        assert_eq!(denial.denied_amount, dec!(0));
    }

    #[tokio::test]
    async fn test_never_deduplicates() {
        let port = MockClaimPort::new();
        let creator = DenialCreator::new(Arc::new(port.clone()));
        let claim_id = ClaimId::new();

        let first = creator.create_denial(claim_id, &tenant(), Some("x"), None).await.unwrap();
        let second = creator.create_denial(claim_id, &tenant(), Some("x"), None).await.unwrap();

        assert_ne!(first, second);
        assert_eq!(port.denials().await.len(), 2);
    }

    #[tokio::test]
    async fn test_store_failure_is_persistence_error() {
        let port = MockClaimPort::new();
        port.fail_on(ClaimOperation::InsertDenial).await;
        let creator = DenialCreator::new(Arc::new(port));

        let err = creator
            .create_denial(ClaimId::new(), &tenant(), None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ClaimError::Persistence { entity: "denial", .. }));
    }
}
