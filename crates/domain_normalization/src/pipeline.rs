//! Pipeline Coordinator
//!
//! Runs one claim through the normalization stages:
//!
//! ```text
//! LOAD_CLAIM -> FETCH_DOCUMENT -> EXTRACT -> VALIDATE -> RESOLVE_ENTITIES
//!     -> CREATE_DENIAL -> UPDATE_CLAIM -> SET_STATUS(DENIED)
//! ```
//!
//! Any stage failure ends the run: the claim is marked
//! `MANUAL_REVIEW_REQUIRED` with the error text, an `ERROR` audit event is
//! appended and an error outcome is returned. Both side effects are best
//! effort. Rows written before the failing stage are left in place, so a
//! retried claim can leave extra patients, payers and denials behind.
//!
//! All stages share one deadline. The cleanup writes get their own budget so
//! they still run after the deadline has passed.

use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use tokio::time::{timeout, timeout_at, Instant};
use tracing::{debug, error, info, instrument, warn};

use core_kernel::{ClaimId, PortError, TenantId};
use domain_claims::{Claim, ClaimMutator, ClaimPort, ClaimStatus, DenialCreator, DenialPort};
use domain_party::{EntityResolver, PatientPort, PayerPort};

use crate::audit::AuditEvent;
use crate::config::PipelineConfig;
use crate::error::NormalizationError;
use crate::extraction::{ExtractionResult, FieldExtractor};
use crate::outcome::{EntitiesCreated, NormalizationOutcome};
use crate::ports::{AuditSink, ObjectStore, TextDetector};
use crate::request::NormalizationRequest;
use crate::validation::{ClaimContext, ClaimValidator};

/// Collaborators of the pipeline, constructed by the caller
#[derive(Clone)]
pub struct NormalizationDeps {
    pub claims: Arc<dyn ClaimPort>,
    pub denials: Arc<dyn DenialPort>,
    pub patients: Arc<dyn PatientPort>,
    pub payers: Arc<dyn PayerPort>,
    pub objects: Arc<dyn ObjectStore>,
    pub text_detector: Arc<dyn TextDetector>,
    pub audit: Arc<dyn AuditSink>,
}

/// What a run learned before it stopped, for the audit event
#[derive(Debug, Default)]
struct RunContext {
    tenant_id: Option<TenantId>,
    processing_type: Option<String>,
    summary: Option<Value>,
}

impl RunContext {
    fn record_extraction(&mut self, extraction: &ExtractionResult) {
        self.processing_type = Some(extraction.processing_type.to_string());
        self.summary = serde_json::to_value(&extraction.summary).ok();
    }
}

/// Coordinates normalization of uploaded claims
///
/// Holds no per-claim state; one instance serves any number of concurrent
/// runs.
#[derive(Clone)]
pub struct NormalizationPipeline {
    claims: Arc<dyn ClaimPort>,
    objects: Arc<dyn ObjectStore>,
    audit: Arc<dyn AuditSink>,
    extractor: FieldExtractor,
    resolver: EntityResolver,
    denials: DenialCreator,
    mutator: ClaimMutator,
    config: PipelineConfig,
}

impl NormalizationPipeline {
    pub fn new(deps: NormalizationDeps, config: PipelineConfig) -> Self {
        Self {
            extractor: FieldExtractor::new(deps.text_detector),
            resolver: EntityResolver::new(deps.patients, deps.payers),
            denials: DenialCreator::new(deps.denials),
            mutator: ClaimMutator::new(Arc::clone(&deps.claims)),
            claims: deps.claims,
            objects: deps.objects,
            audit: deps.audit,
            config,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Normalizes one claim within the configured stage timeout
    pub async fn run(&self, request: &NormalizationRequest) -> NormalizationOutcome {
        let deadline = Instant::now() + self.config.stage_timeout;
        self.run_with_deadline(request, deadline).await
    }

    /// Normalizes one claim, giving up on any stage still running at `deadline`
    ///
    /// Never fails: every error becomes [`NormalizationOutcome::Error`]. A
    /// request whose claim id cannot be parsed is rejected without touching
    /// any store.
    #[instrument(skip(self, request, deadline), fields(claim_id = %request.claim_id))]
    pub async fn run_with_deadline(&self, request: &NormalizationRequest, deadline: Instant) -> NormalizationOutcome {
        let claim_id = match request.parse_claim_id() {
            Ok(id) => id,
            Err(err) => {
                warn!(error = %err, "Rejected normalization request");
                return NormalizationOutcome::failure(request.claim_id.clone(), &err);
            }
        };

        let mut context = RunContext {
            tenant_id: request.tenant_hint(),
            ..Default::default()
        };

        match self.normalize(claim_id, deadline, &mut context).await {
            Ok((entities, extraction)) => {
                let summary = context.summary.take().unwrap_or_else(|| Value::Object(Default::default()));
                self.record(AuditEvent::success(
                    claim_id,
                    context.tenant_id.clone(),
                    extraction.processing_type.as_str(),
                    summary,
                ))
                .await;
                info!(
                    patient_id = %entities.patient_id,
                    payer_id = %entities.payer_id,
                    denial_id = %entities.denial_id,
                    "Claim normalized"
                );
                NormalizationOutcome::success(request.claim_id.clone(), entities, extraction.summary)
            }
            Err(err) => self.fail(claim_id, &request.claim_id, context, err).await,
        }
    }

    async fn normalize(
        &self,
        claim_id: ClaimId,
        deadline: Instant,
        context: &mut RunContext,
    ) -> Result<(EntitiesCreated, ExtractionResult), NormalizationError> {
        let claim = self.load_claim(claim_id, deadline).await?;
        if claim.tenant_id.is_some() {
            context.tenant_id = claim.tenant_id.clone();
        }

        let document = self
            .bounded(deadline, "object store read", self.objects.get_object(&claim.file.location))
            .await?
            .map_err(|e| NormalizationError::transport("object store read", e))?;

        let extraction = self
            .bounded(deadline, "extraction", self.extractor.extract(&claim.file.content_type, &document))
            .await??;
        context.record_extraction(&extraction);
        debug!(
            processing_type = %extraction.processing_type,
            fields_extracted = extraction.fields.count(),
            "Extraction finished"
        );

        ClaimValidator::validate(&ClaimContext::from(&claim), &extraction.fields).into_result()?;
        let (Some(tenant_id), Some(hospital_id)) = (claim.tenant_id.as_ref(), claim.hospital_id.as_ref()) else {
            return Err(NormalizationError::Internal("validated claim lost its scope".to_string()));
        };

        let fields = &extraction.fields;
        let patient_id = self
            .bounded(
                deadline,
                "patient resolution",
                self.resolver.resolve_patient(tenant_id, hospital_id, fields.patient_name.as_deref()),
            )
            .await??;
        let payer_id = self
            .bounded(
                deadline,
                "payer resolution",
                self.resolver.resolve_payer(tenant_id, fields.hospital_name.as_deref()),
            )
            .await??;
        let denial_id = self
            .bounded(
                deadline,
                "denial creation",
                self.denials.create_denial(
                    claim.id,
                    tenant_id,
                    fields.denial_reason.as_deref(),
                    fields.denied_amount.as_deref(),
                ),
            )
            .await??;

        self.bounded(
            deadline,
            "claim update",
            self.mutator.apply(&claim, &fields.claim_fields(), patient_id, payer_id, denial_id),
        )
        .await??;
        self.bounded(deadline, "claim status update", self.mutator.set_status(claim.id, ClaimStatus::Denied))
            .await??;

        let entities = EntitiesCreated {
            patient_id,
            payer_id,
            denial_id,
            claim_updated: true,
        };
        Ok((entities, extraction))
    }

    async fn load_claim(&self, claim_id: ClaimId, deadline: Instant) -> Result<Claim, NormalizationError> {
        match self.bounded(deadline, "claim lookup", self.claims.get_claim(claim_id)).await? {
            Ok(Some(claim)) => Ok(claim),
            Ok(None) => Err(NormalizationError::ClaimNotFound(claim_id.to_string())),
            Err(e) if e.is_not_found() => Err(NormalizationError::ClaimNotFound(claim_id.to_string())),
            Err(e) => Err(NormalizationError::transport("claim lookup", e)),
        }
    }

    /// Runs `future` unless `deadline` passes first
    ///
    /// A timeout reports how long this operation waited, not the configured
    /// stage budget, since callers may pass their own deadline.
    async fn bounded<T>(
        &self,
        deadline: Instant,
        operation: &'static str,
        future: impl Future<Output = T>,
    ) -> Result<T, NormalizationError> {
        let started = Instant::now();
        timeout_at(deadline, future)
            .await
            .map_err(|_| NormalizationError::transport(operation, PortError::timeout(operation, started.elapsed())))
    }

    async fn fail(
        &self,
        claim_id: ClaimId,
        requested_id: &str,
        context: RunContext,
        err: NormalizationError,
    ) -> NormalizationOutcome {
        let message = err.to_string();
        error!(kind = err.kind(), error = %message, "Normalization failed, claim needs manual review");

        match timeout(self.config.cleanup_timeout, self.mutator.mark_manual_review(claim_id, &message)).await {
            Ok(Ok(())) => {}
            Ok(Err(mark_err)) => error!(error = %mark_err, "Failed to mark claim for manual review"),
            Err(_) => error!("Timed out marking claim for manual review"),
        }

        self.record(AuditEvent::failure(
            claim_id,
            context.tenant_id,
            context.processing_type,
            context.summary.unwrap_or_else(|| Value::Object(Default::default())),
            message,
        ))
        .await;

        NormalizationOutcome::failure(requested_id, &err)
    }

    /// Appends an audit event; failures are logged and dropped
    async fn record(&self, event: AuditEvent) {
        match timeout(self.config.cleanup_timeout, self.audit.append(&event)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => error!(error = %e, status = %event.status, "Failed to write audit event"),
            Err(_) => error!(status = %event.status, "Timed out writing audit event"),
        }
    }
}
