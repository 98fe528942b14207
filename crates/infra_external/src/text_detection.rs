//! HTTP Text Detection Client
//!
//! Sends the raw document to a text detection endpoint and keeps the `LINE`
//! blocks of the answer, in the order the service returned them.
//!
//! # Response Format
//!
//! ```json
//! {
//!   "Blocks": [
//!     { "BlockType": "PAGE" },
//!     { "BlockType": "LINE", "Text": "Claim No: C-1", "Confidence": 99.2,
//!       "Geometry": { "BoundingBox": { "Left": 0.1, "Top": 0.2, "Width": 0.3, "Height": 0.02 } } },
//!     { "BlockType": "WORD", "Text": "Claim" }
//!   ]
//! }
//! ```
//!
//! # Error Handling
//!
//! - Request timeout -> `PortError::Timeout`
//! - Connect failure -> `PortError::Connection`
//! - 429 / 5xx -> `PortError::ServiceUnavailable`
//! - Other non-success status -> `PortError::Validation` (document rejected)
//! - Unreadable body -> `PortError::Transformation`

use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use serde::Deserialize;
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};

use core_kernel::{DomainPort, HealthCheckResult, HealthCheckable, PortError};
use domain_normalization::{BoundingBox, TextDetector, TextLine};

const SERVICE: &str = "text detection";

/// Configuration for the text detection client
#[derive(Debug, Clone)]
pub struct TextDetectionConfig {
    /// Full URL of the detection endpoint
    pub endpoint: String,

    /// Sent as a bearer token when present
    pub api_key: Option<String>,

    /// Per-request timeout
    pub timeout: Duration,
}

impl TextDetectionConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: None,
            timeout: Duration::from_secs(30),
        }
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// `TextDetector` backed by an HTTP service
#[derive(Debug, Clone)]
pub struct HttpTextDetector {
    config: TextDetectionConfig,
    http: Client,
}

impl HttpTextDetector {
    /// Builds the client
    ///
    /// # Errors
    ///
    /// Returns `PortError::Internal` when the HTTP client cannot be built
    pub fn new(config: TextDetectionConfig) -> Result<Self, PortError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| PortError::Internal {
                message: "building text detection client".to_string(),
                source: Some(Box::new(e)),
            })?;

        Ok(Self { config, http })
    }

    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    fn request_error(&self, e: reqwest::Error) -> PortError {
        if e.is_timeout() {
            PortError::timeout(SERVICE, self.config.timeout)
        } else {
            PortError::Connection {
                message: format!("{} request failed", SERVICE),
                source: Some(Box::new(e)),
            }
        }
    }
}

impl DomainPort for HttpTextDetector {}

#[async_trait]
impl TextDetector for HttpTextDetector {
    #[instrument(skip(self, document), fields(size = document.len()))]
    async fn detect_lines(&self, document: &[u8]) -> Result<Vec<TextLine>, PortError> {
        let mut request = self
            .http
            .post(&self.config.endpoint)
            .header(header::CONTENT_TYPE, "application/pdf")
            .header(header::ACCEPT, "application/json")
            .body(document.to_vec());
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| self.request_error(e))?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
            warn!(%status, "Text detection unavailable");
            return Err(PortError::ServiceUnavailable {
                service: format!("{} ({})", SERVICE, status),
            });
        }
        if !status.is_success() {
            return Err(PortError::validation(format!("{} rejected document: {}", SERVICE, status)));
        }

        let body = response.bytes().await.map_err(|e| self.request_error(e))?;
        let lines = lines_from_response(&body)?;

        debug!(lines = lines.len(), "Text detected");
        Ok(lines)
    }
}

#[async_trait]
impl HealthCheckable for HttpTextDetector {
    /// Reports the configured endpoint without calling it; detection calls
    /// are billed per document
    async fn health_check(&self) -> HealthCheckResult {
        let probe = reqwest::Url::parse(&self.config.endpoint)
            .map(|_| ())
            .map_err(|e| format!("invalid endpoint: {}", e));
        HealthCheckResult::from_probe("http-text-detector", Instant::now(), probe)
    }
}

// ============================================================================
// Response parsing
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DetectionResponse {
    #[serde(default)]
    blocks: Vec<Block>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Block {
    block_type: String,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    confidence: Option<f32>,
    #[serde(default)]
    geometry: Option<Geometry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Geometry {
    #[serde(default)]
    bounding_box: Option<Box2D>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Box2D {
    left: f32,
    top: f32,
    width: f32,
    height: f32,
}

/// Extracts the `LINE` blocks of a detection response
///
/// A line without text is kept as an empty line; a missing confidence is 0.
pub fn lines_from_response(body: &[u8]) -> Result<Vec<TextLine>, PortError> {
    let response: DetectionResponse = serde_json::from_slice(body)
        .map_err(|e| PortError::transformation(format!("{} response: {}", SERVICE, e)))?;

    let lines = response
        .blocks
        .into_iter()
        .filter(|block| block.block_type == "LINE")
        .map(|block| TextLine {
            text: block.text.unwrap_or_default(),
            confidence: block.confidence.unwrap_or(0.0),
            geometry: block.geometry.and_then(|g| g.bounding_box).map(|b| BoundingBox {
                left: b.left,
                top: b.top,
                width: b.width,
                height: b.height,
            }),
        })
        .collect();

    Ok(lines)
}
