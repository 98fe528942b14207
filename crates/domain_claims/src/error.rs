//! Claims domain errors

use thiserror::Error;

use core_kernel::PortError;

/// Errors that can occur in the claims domain
#[derive(Debug, Error)]
pub enum ClaimError {
    #[error("Claim not found: {0}")]
    ClaimNotFound(String),

    #[error("Unknown claim status: {0}")]
    UnknownStatus(String),

    /// A claim or denial write failed; earlier writes are not rolled back
    #[error("Failed to persist {entity}: {source}")]
    Persistence {
        entity: &'static str,
        #[source]
        source: PortError,
    },
}

impl ClaimError {
    pub fn persistence(entity: &'static str, source: PortError) -> Self {
        ClaimError::Persistence { entity, source }
    }
}
