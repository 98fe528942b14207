//! Normalization Domain
//!
//! Reads an uploaded claim document, checks that enough was found, links the
//! claim to its patient, payer and a new denial, and moves the claim to
//! `DENIED`. Any failure sends the claim to `MANUAL_REVIEW_REQUIRED` instead.
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_normalization::{NormalizationDeps, NormalizationPipeline, NormalizationRequest, PipelineConfig};
//!
//! let pipeline = NormalizationPipeline::new(deps, PipelineConfig::default());
//! let outcome = pipeline.run(&NormalizationRequest::new(claim_id)).await;
//! if !outcome.is_success() {
//!     // the claim is already flagged for manual review
//! }
//! ```

pub mod extraction;
pub mod validation;
pub mod audit;
pub mod ports;
pub mod request;
pub mod outcome;
pub mod pipeline;
pub mod config;
pub mod error;

pub use extraction::{
    BoundingBox, DocumentKind, ExtractedFields, ExtractionDetail, ExtractionResult, FieldExtractor, ProcessingSummary,
    ProcessingType, TextLine,
};
pub use validation::{ClaimContext, ClaimValidator, ValidationResult};
pub use audit::{AuditEvent, AuditStatus};
pub use ports::{AuditSink, ObjectStore, TextDetector};
#[cfg(any(test, feature = "mock"))]
pub use ports::mock::{MockAuditSink, MockObjectStore, MockTextDetector};
pub use request::NormalizationRequest;
pub use outcome::{EntitiesCreated, NormalizationOutcome};
pub use pipeline::{NormalizationDeps, NormalizationPipeline};
pub use config::PipelineConfig;
pub use error::{ExtractionError, NormalizationError};
