//! Collaborator ports used only by the normalization pipeline
//!
//! `infra_external` implements the object store and text detector;
//! `infra_db` implements the audit sink on top of the agent log table.

use async_trait::async_trait;

use core_kernel::{DomainPort, PortError};
use domain_claims::StorageLocation;

use crate::audit::AuditEvent;
use crate::extraction::TextLine;

/// Read access to uploaded documents
#[async_trait]
pub trait ObjectStore: DomainPort {
    async fn get_object(&self, location: &StorageLocation) -> Result<Vec<u8>, PortError>;
}

/// Line-level text detection for scanned or digital PDFs
#[async_trait]
pub trait TextDetector: DomainPort {
    /// Returns the document's lines in reading order
    async fn detect_lines(&self, document: &[u8]) -> Result<Vec<TextLine>, PortError>;
}

/// Append-only agent log
#[async_trait]
pub trait AuditSink: DomainPort {
    async fn append(&self, event: &AuditEvent) -> Result<(), PortError>;
}

/// In-memory implementations for tests
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::RwLock;

    /// Object store backed by a map from `bucket/key` to bytes
    #[derive(Debug, Default, Clone)]
    pub struct MockObjectStore {
        objects: Arc<RwLock<HashMap<String, Vec<u8>>>>,
        delay: Arc<RwLock<Option<Duration>>>,
        unavailable: Arc<RwLock<bool>>,
    }

    impl MockObjectStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub async fn put(&self, location: &StorageLocation, bytes: impl Into<Vec<u8>>) {
            self.objects.write().await.insert(location.to_string(), bytes.into());
        }

        /// Delays every read, for deadline tests
        pub async fn set_delay(&self, delay: Duration) {
            *self.delay.write().await = Some(delay);
        }

        pub async fn set_unavailable(&self, unavailable: bool) {
            *self.unavailable.write().await = unavailable;
        }
    }

    impl DomainPort for MockObjectStore {}

    #[async_trait]
    impl ObjectStore for MockObjectStore {
        async fn get_object(&self, location: &StorageLocation) -> Result<Vec<u8>, PortError> {
            if let Some(delay) = *self.delay.read().await {
                tokio::time::sleep(delay).await;
            }
            if *self.unavailable.read().await {
                return Err(PortError::connection("object store unavailable"));
            }
            self.objects
                .read()
                .await
                .get(&location.to_string())
                .cloned()
                .ok_or_else(|| PortError::not_found("Object", location))
        }
    }

    /// Text detector returning canned lines
    #[derive(Debug, Default, Clone)]
    pub struct MockTextDetector {
        lines: Arc<RwLock<Vec<TextLine>>>,
        calls: Arc<RwLock<usize>>,
        unavailable: Arc<RwLock<bool>>,
    }

    impl MockTextDetector {
        pub fn new() -> Self {
            Self::default()
        }

        /// Detector that returns one line per entry at 99% confidence
        pub async fn with_lines(lines: &[&str]) -> Self {
            let detector = Self::new();
            *detector.lines.write().await = lines.iter().map(|text| TextLine::new(*text, 99.0)).collect();
            detector
        }

        pub async fn set_unavailable(&self, unavailable: bool) {
            *self.unavailable.write().await = unavailable;
        }

        pub async fn calls(&self) -> usize {
            *self.calls.read().await
        }
    }

    impl DomainPort for MockTextDetector {}

    #[async_trait]
    impl TextDetector for MockTextDetector {
        async fn detect_lines(&self, _document: &[u8]) -> Result<Vec<TextLine>, PortError> {
            *self.calls.write().await += 1;
            if *self.unavailable.read().await {
                return Err(PortError::ServiceUnavailable {
                    service: "text detection".to_string(),
                });
            }
            Ok(self.lines.read().await.clone())
        }
    }

    /// Audit sink that records events
    #[derive(Debug, Default, Clone)]
    pub struct MockAuditSink {
        events: Arc<RwLock<Vec<AuditEvent>>>,
        unavailable: Arc<RwLock<bool>>,
    }

    impl MockAuditSink {
        pub fn new() -> Self {
            Self::default()
        }

        pub async fn set_unavailable(&self, unavailable: bool) {
            *self.unavailable.write().await = unavailable;
        }

        pub async fn events(&self) -> Vec<AuditEvent> {
            self.events.read().await.clone()
        }
    }

    impl DomainPort for MockAuditSink {}

    #[async_trait]
    impl AuditSink for MockAuditSink {
        async fn append(&self, event: &AuditEvent) -> Result<(), PortError> {
            if *self.unavailable.read().await {
                return Err(PortError::connection("agent log unavailable"));
            }
            self.events.write().await.push(event.clone());
            Ok(())
        }
    }
}
