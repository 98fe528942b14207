//! Pre-write sufficiency checks
//!
//! # Rules
//!
//! - The claim must belong to a tenant
//! - The claim must belong to a hospital
//! - Either a claim number was extracted or the upload has a filename to
//!   stand in for it
//!
//! All rules are checked; the result lists every violation in rule order.

use core_kernel::{HospitalId, TenantId};
use domain_claims::Claim;

use crate::error::NormalizationError;
use crate::extraction::ExtractedFields;

pub const MISSING_TENANT: &str = "Missing tenant_id";
pub const MISSING_HOSPITAL: &str = "Missing hospital_id";
pub const MISSING_IDENTIFIER: &str = "No claim identifier found";

/// Result of claim validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl ValidationResult {
    pub fn ok() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
        }
    }

    pub fn add_error(&mut self, error: impl Into<String>) {
        self.errors.push(error.into());
        self.valid = false;
    }

    /// Converts a failed result into [`NormalizationError::ValidationFailed`]
    pub fn into_result(self) -> Result<(), NormalizationError> {
        if self.valid {
            Ok(())
        } else {
            Err(NormalizationError::ValidationFailed(self.errors))
        }
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::ok()
    }
}

/// The parts of a claim the rules look at
#[derive(Debug, Clone, Copy, Default)]
pub struct ClaimContext<'a> {
    pub tenant_id: Option<&'a TenantId>,
    pub hospital_id: Option<&'a HospitalId>,
    pub original_filename: Option<&'a str>,
}

impl<'a> From<&'a Claim> for ClaimContext<'a> {
    fn from(claim: &'a Claim) -> Self {
        Self {
            tenant_id: claim.tenant_id.as_ref(),
            hospital_id: claim.hospital_id.as_ref(),
            original_filename: claim.fallback_identifier(),
        }
    }
}

/// Validator for extracted claims
pub struct ClaimValidator;

impl ClaimValidator {
    /// Checks that a claim has enough context to be normalized
    ///
    /// # Arguments
    ///
    /// * `context` - Tenant, hospital and filename of the claim
    /// * `fields` - Fields read from the document
    pub fn validate(context: &ClaimContext<'_>, fields: &ExtractedFields) -> ValidationResult {
        let mut result = ValidationResult::ok();

        if context.tenant_id.is_none() {
            result.add_error(MISSING_TENANT);
        }

        if context.hospital_id.is_none() {
            result.add_error(MISSING_HOSPITAL);
        }

        let has_claim_number = fields
            .claim_number
            .as_deref()
            .is_some_and(|n| !n.trim().is_empty());
        let has_filename = context
            .original_filename
            .is_some_and(|n| !n.trim().is_empty());
        if !has_claim_number && !has_filename {
            result.add_error(MISSING_IDENTIFIER);
        }

        result
    }
}
