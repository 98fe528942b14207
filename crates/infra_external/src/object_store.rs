//! Filesystem Object Store
//!
//! Serves uploaded documents from a local directory. A storage location
//! `bucket/key` maps to `<root>/<bucket>/<key>`; keys may contain `/`.

use async_trait::async_trait;
use std::time::Instant;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, instrument};

use core_kernel::{DomainPort, HealthCheckResult, HealthCheckable, PortError};
use domain_claims::StorageLocation;
use domain_normalization::ObjectStore;

/// `ObjectStore` over a directory tree
#[derive(Debug, Clone)]
pub struct FsObjectStore {
    root: PathBuf,
}

impl FsObjectStore {
    /// Creates a store rooted at `root`
    ///
    /// # Arguments
    ///
    /// * `root` - Directory holding one subdirectory per bucket
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves a location to a path below the root
    ///
    /// Only plain path segments are accepted, so a key cannot climb out of
    /// its bucket.
    pub fn resolve(&self, location: &StorageLocation) -> Result<PathBuf, PortError> {
        let mut path = self.root.clone();
        for part in [location.bucket.as_str(), location.key.as_str()] {
            let relative = Path::new(part);
            if part.is_empty() || !relative.components().all(|c| matches!(c, Component::Normal(_))) {
                return Err(PortError::validation(format!("invalid storage location '{}'", location)));
            }
            path.push(relative);
        }
        Ok(path)
    }
}

impl DomainPort for FsObjectStore {}

#[async_trait]
impl ObjectStore for FsObjectStore {
    #[instrument(skip(self), fields(location = %location))]
    async fn get_object(&self, location: &StorageLocation) -> Result<Vec<u8>, PortError> {
        let path = self.resolve(location)?;

        match tokio::fs::read(&path).await {
            Ok(bytes) => {
                debug!(size = bytes.len(), "Object read");
                Ok(bytes)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Err(PortError::not_found("Object", location)),
            Err(e) => Err(PortError::Connection {
                message: format!("reading {}: {}", path.display(), e),
                source: Some(Box::new(e)),
            }),
        }
    }
}

#[async_trait]
impl HealthCheckable for FsObjectStore {
    async fn health_check(&self) -> HealthCheckResult {
        let started = Instant::now();
        let probe = match tokio::fs::metadata(&self.root).await {
            Ok(meta) if meta.is_dir() => Ok(()),
            Ok(_) => Err(format!("{} is not a directory", self.root.display())),
            Err(e) => Err(format!("{}: {}", self.root.display(), e)),
        };
        HealthCheckResult::from_probe("fs-object-store", started, probe)
    }
}
