//! Claims Domain
//!
//! This crate holds the claim record as seen by the normalization pipeline,
//! the denial records it creates, and the services that write both.
//!
//! # Normalization Lifecycle
//!
//! ```text
//! NEW / UPLOAD_PENDING -> (fields applied) -> DENIED
//!                     \-> MANUAL_REVIEW_REQUIRED (any failure)
//! ```

mod amount;
pub mod claim;
pub mod denial;
pub mod mutator;
pub mod ports;
pub mod error;

pub use claim::{Claim, ClaimStatus, ClaimUpdate, StorageLocation, StoredFile};
pub use denial::{Denial, DenialCreator, UNSPECIFIED_REASON};
pub use mutator::{ClaimFields, ClaimMutator};
pub use ports::{ClaimPort, DenialPort};
#[cfg(any(test, feature = "mock"))]
pub use ports::mock::{ClaimOperation, MockClaimPort};
pub use error::ClaimError;
