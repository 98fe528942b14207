//! API error handling
//!
//! Normalization failures are not API errors: they travel inside a
//! `NormalizationOutcome` with status 200. `ApiError` covers requests the API
//! refuses before any pipeline runs.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The body was not JSON or did not match the request shape
    #[error("Invalid request body: {0}")]
    InvalidBody(#[from] JsonRejection),

    /// Well-formed JSON that breaks a request rule
    #[error("Validation error: {message}")]
    Validation { message: String, details: Vec<String> },
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation {
            message: message.into(),
            details: Vec::new(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidBody(rejection) => rejection.status(),
            ApiError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match self {
            ApiError::InvalidBody(rejection) => ErrorResponse {
                error: "invalid_body".to_string(),
                message: rejection.body_text(),
                details: Vec::new(),
            },
            ApiError::Validation { message, details } => ErrorResponse {
                error: "validation_error".to_string(),
                message,
                details,
            },
        };

        (status, Json(body)).into_response()
    }
}

/// One detail line per failed field rule, sorted by field
impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut details: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, field_errors)| {
                field_errors.iter().map(move |e| {
                    let reason = e.message.as_ref().map(|m| m.to_string()).unwrap_or_else(|| e.code.to_string());
                    format!("{}: {}", field, reason)
                })
            })
            .collect();
        details.sort();

        ApiError::Validation {
            message: "request failed validation".to_string(),
            details,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Batch {
        #[validate(length(min = 1, message = "at least one claim is required"))]
        claim_ids: Vec<String>,
    }

    #[test]
    fn test_validation_is_unprocessable() {
        let response = ApiError::validation("batch too large").into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_field_errors_become_details() {
        let err: ApiError = Batch { claim_ids: vec![] }.validate().unwrap_err().into();
        match err {
            ApiError::Validation { details, .. } => {
                assert_eq!(details, vec!["claim_ids: at least one claim is required".to_string()]);
            }
            other => panic!("unexpected error {:?}", other),
        }
    }
}
