//! In-memory pipeline harness
//!
//! Wires every mock port into a `NormalizationPipeline` and keeps handles to
//! the mocks so tests can stage documents and inspect what was written.
//!
//! ```rust,ignore
//! let harness = TestHarness::new();
//! let claim_id = harness.upload(ClaimBuilder::new().build(), DocumentFixtures::denial_csv()).await;
//! let outcome = harness.run(claim_id).await;
//! assert_normalized(&outcome);
//! ```

use std::sync::Arc;

use core_kernel::ClaimId;
use domain_claims::{Claim, Denial, MockClaimPort};
use domain_normalization::{
    AuditEvent, MockAuditSink, MockObjectStore, MockTextDetector, NormalizationDeps, NormalizationOutcome,
    NormalizationPipeline, NormalizationRequest, PipelineConfig,
};
use domain_party::{MockPatientPort, MockPayerPort, Patient, PatientPort, Payer, PayerPort};

/// Pipeline over in-memory collaborators
pub struct TestHarness {
    pub claims: MockClaimPort,
    pub patients: MockPatientPort,
    pub payers: MockPayerPort,
    pub objects: MockObjectStore,
    pub detector: MockTextDetector,
    pub audit: MockAuditSink,
    pub pipeline: NormalizationPipeline,
}

impl TestHarness {
    /// Harness whose text detector finds no lines
    pub fn new() -> Self {
        Self::build(MockTextDetector::new(), PipelineConfig::new())
    }

    /// Harness whose text detector returns `lines` for every PDF
    pub async fn with_pdf_lines(lines: &[&str]) -> Self {
        Self::build(MockTextDetector::with_lines(lines).await, PipelineConfig::new())
    }

    pub fn build(detector: MockTextDetector, config: PipelineConfig) -> Self {
        let claims = MockClaimPort::new();
        let patients = MockPatientPort::new();
        let payers = MockPayerPort::new();
        let objects = MockObjectStore::new();
        let audit = MockAuditSink::new();

        let pipeline = NormalizationPipeline::new(
            NormalizationDeps {
                claims: Arc::new(claims.clone()),
                denials: Arc::new(claims.clone()),
                patients: Arc::new(patients.clone()),
                payers: Arc::new(payers.clone()),
                objects: Arc::new(objects.clone()),
                text_detector: Arc::new(detector.clone()),
                audit: Arc::new(audit.clone()),
            },
            config,
        );

        Self {
            claims,
            patients,
            payers,
            objects,
            detector,
            audit,
            pipeline,
        }
    }

    /// Stores the claim record and its document
    pub async fn upload(&self, claim: Claim, document: impl Into<Vec<u8>>) -> ClaimId {
        let id = claim.id;
        self.objects.put(&claim.file.location, document).await;
        self.claims.insert_claim(claim).await;
        id
    }

    /// Stores a claim record whose document never made it to the store
    pub async fn register_without_document(&self, claim: Claim) -> ClaimId {
        let id = claim.id;
        self.claims.insert_claim(claim).await;
        id
    }

    pub async fn seed_patient(&self, patient: Patient) {
        self.patients
            .insert_patient(&patient)
            .await
            .expect("seeding patient");
    }

    pub async fn seed_payer(&self, payer: Payer) {
        self.payers.insert_payer(&payer).await.expect("seeding payer");
    }

    pub async fn run(&self, claim_id: ClaimId) -> NormalizationOutcome {
        self.pipeline.run(&NormalizationRequest::for_claim(claim_id)).await
    }

    pub async fn run_request(&self, request: &NormalizationRequest) -> NormalizationOutcome {
        self.pipeline.run(request).await
    }

    /// Current state of a stored claim
    pub async fn claim(&self, claim_id: ClaimId) -> Claim {
        self.claims.claim(claim_id).await.expect("claim was uploaded")
    }

    pub async fn denials(&self) -> Vec<Denial> {
        self.claims.denials().await
    }

    pub async fn audit_events(&self) -> Vec<AuditEvent> {
        self.audit.events().await
    }

    pub async fn patients(&self) -> Vec<Patient> {
        self.patients.patients().await
    }

    pub async fn payers(&self) -> Vec<Payer> {
        self.payers.payers().await
    }
}
