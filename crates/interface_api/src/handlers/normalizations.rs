//! Normalization handlers

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use tracing::{error, info, instrument};
use validator::Validate;

use domain_normalization::{NormalizationError, NormalizationOutcome, NormalizationRequest};

use crate::dto::normalizations::{BatchNormalizationRequest, BatchNormalizationResponse};
use crate::{error::ApiError, AppState};

/// Normalizes one claim
///
/// Answers 200 with the outcome for any well-formed body; a failed run
/// reports `"status": "error"` and has already flagged the claim for manual
/// review.
#[instrument(skip(state, payload))]
pub async fn normalize_claim(
    State(state): State<AppState>,
    payload: Result<Json<NormalizationRequest>, JsonRejection>,
) -> Result<Json<NormalizationOutcome>, ApiError> {
    let Json(request) = payload?;
    let outcome = state.pipeline.run(&request).await;
    info!(claim_id = %request.claim_id, success = outcome.is_success(), "Normalization finished");
    Ok(Json(outcome))
}

/// Normalizes a batch of claims
///
/// Each claim runs as its own task; outcomes come back in request order.
/// Batches above the configured maximum are refused with 422.
#[instrument(skip(state, payload))]
pub async fn normalize_batch(
    State(state): State<AppState>,
    payload: Result<Json<BatchNormalizationRequest>, JsonRejection>,
) -> Result<Json<BatchNormalizationResponse>, ApiError> {
    let Json(request) = payload?;
    request.validate()?;
    if request.claim_ids.len() > state.config.max_batch_size {
        return Err(ApiError::validation(format!(
            "batch of {} claims exceeds the maximum of {}",
            request.claim_ids.len(),
            state.config.max_batch_size
        )));
    }

    let tenant_id = request.tenant_id;
    let tasks: Vec<_> = request
        .claim_ids
        .into_iter()
        .map(|claim_id| {
            let pipeline = state.pipeline.clone();
            let run = NormalizationRequest {
                claim_id: claim_id.clone(),
                tenant_id: tenant_id.clone(),
            };
            (claim_id, tokio::spawn(async move { pipeline.run(&run).await }))
        })
        .collect();

    let mut outcomes = Vec::with_capacity(tasks.len());
    for (claim_id, task) in tasks {
        let outcome = match task.await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(claim_id = %claim_id, error = %e, "Normalization task aborted");
                NormalizationOutcome::failure(
                    claim_id,
                    &NormalizationError::Internal(format!("normalization task aborted: {}", e)),
                )
            }
        };
        outcomes.push(outcome);
    }

    let response = BatchNormalizationResponse::from_outcomes(outcomes);
    info!(succeeded = response.succeeded, failed = response.failed, "Batch finished");
    Ok(Json(response))
}
