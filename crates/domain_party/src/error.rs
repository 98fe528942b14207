//! Party domain errors

use thiserror::Error;

use core_kernel::PortError;

/// Errors that can occur in the party domain
#[derive(Debug, Error)]
pub enum PartyError {
    /// Invalid party data provided
    #[error("Invalid party data: {0}")]
    InvalidData(String),

    /// Looking up or inserting a patient/payer failed
    #[error("Failed to resolve {entity}: {source}")]
    Persistence {
        entity: &'static str,
        #[source]
        source: PortError,
    },
}

impl PartyError {
    pub fn persistence(entity: &'static str, source: PortError) -> Self {
        PartyError::Persistence { entity, source }
    }
}
