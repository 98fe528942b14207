//! Claims Domain Ports
//!
//! The claim store and the denial table are reached through these traits.
//! `infra_db` provides the PostgreSQL adapters; the `mock` module provides an
//! in-memory implementation for tests.

use async_trait::async_trait;

use core_kernel::{ClaimId, DomainPort, PortError};

use crate::claim::{Claim, ClaimStatus, ClaimUpdate};
use crate::denial::Denial;

/// Access to claim records
///
/// Claims are created upstream; this port only reads them and applies the
/// normalization updates.
#[async_trait]
pub trait ClaimPort: DomainPort {
    /// Loads a claim, returning `Ok(None)` when it does not exist
    async fn get_claim(&self, id: ClaimId) -> Result<Option<Claim>, PortError>;

    /// Writes claim number, entity links and claim amount
    async fn apply_normalization(&self, id: ClaimId, update: &ClaimUpdate) -> Result<(), PortError>;

    /// Sets the lifecycle status
    async fn set_status(&self, id: ClaimId, status: ClaimStatus) -> Result<(), PortError>;

    /// Sets `MANUAL_REVIEW_REQUIRED` together with the error message
    async fn mark_manual_review(&self, id: ClaimId, error_message: &str) -> Result<(), PortError>;
}

/// Insert-only access to denial records
#[async_trait]
pub trait DenialPort: DomainPort {
    async fn insert_denial(&self, denial: &Denial) -> Result<(), PortError>;
}

/// In-memory implementations for tests
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    /// Operations a test can make fail
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum ClaimOperation {
        Get,
        ApplyNormalization,
        SetStatus,
        MarkManualReview,
        InsertDenial,
    }

    /// In-memory claim store and denial table
    #[derive(Debug, Default, Clone)]
    pub struct MockClaimPort {
        claims: Arc<RwLock<HashMap<ClaimId, Claim>>>,
        denials: Arc<RwLock<Vec<Denial>>>,
        failures: Arc<RwLock<Vec<ClaimOperation>>>,
    }

    impl MockClaimPort {
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-populates with claims
        pub async fn with_claims(claims: Vec<Claim>) -> Self {
            let port = Self::new();
            for claim in claims {
                port.insert_claim(claim).await;
            }
            port
        }

        pub async fn insert_claim(&self, claim: Claim) {
            self.claims.write().await.insert(claim.id, claim);
        }

        /// Makes every subsequent call of `operation` fail with a connection error
        pub async fn fail_on(&self, operation: ClaimOperation) {
            self.failures.write().await.push(operation);
        }

        pub async fn claim(&self, id: ClaimId) -> Option<Claim> {
            self.claims.read().await.get(&id).cloned()
        }

        pub async fn denials(&self) -> Vec<Denial> {
            self.denials.read().await.clone()
        }

        async fn check(&self, operation: ClaimOperation) -> Result<(), PortError> {
            if self.failures.read().await.contains(&operation) {
                return Err(PortError::connection(format!("{:?} unavailable", operation)));
            }
            Ok(())
        }
    }

    impl DomainPort for MockClaimPort {}

    #[async_trait]
    impl ClaimPort for MockClaimPort {
        async fn get_claim(&self, id: ClaimId) -> Result<Option<Claim>, PortError> {
            self.check(ClaimOperation::Get).await?;
            Ok(self.claims.read().await.get(&id).cloned())
        }

        async fn apply_normalization(&self, id: ClaimId, update: &ClaimUpdate) -> Result<(), PortError> {
            self.check(ClaimOperation::ApplyNormalization).await?;
            let mut claims = self.claims.write().await;
            let claim = claims.get_mut(&id).ok_or_else(|| PortError::not_found("Claim", id))?;
            claim.apply_normalization(update);
            Ok(())
        }

        async fn set_status(&self, id: ClaimId, status: ClaimStatus) -> Result<(), PortError> {
            self.check(ClaimOperation::SetStatus).await?;
            let mut claims = self.claims.write().await;
            let claim = claims.get_mut(&id).ok_or_else(|| PortError::not_found("Claim", id))?;
            claim.set_status(status);
            Ok(())
        }

        async fn mark_manual_review(&self, id: ClaimId, error_message: &str) -> Result<(), PortError> {
            self.check(ClaimOperation::MarkManualReview).await?;
            let mut claims = self.claims.write().await;
            let claim = claims.get_mut(&id).ok_or_else(|| PortError::not_found("Claim", id))?;
            claim.mark_manual_review(error_message);
            Ok(())
        }
    }

    #[async_trait]
    impl DenialPort for MockClaimPort {
        async fn insert_denial(&self, denial: &Denial) -> Result<(), PortError> {
            self.check(ClaimOperation::InsertDenial).await?;
            self.denials.write().await.push(denial.clone());
            Ok(())
        }
    }
}
