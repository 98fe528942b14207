//! Application state and production wiring

use sqlx::PgPool;
use std::sync::Arc;

use core_kernel::{HealthCheckable, PortError};
use domain_normalization::{NormalizationDeps, NormalizationPipeline};
use infra_db::{PostgresAuditSink, PostgresClaimAdapter, PostgresPatientAdapter, PostgresPayerAdapter};
use infra_external::{FsObjectStore, HttpTextDetector, TextDetectionConfig};

use crate::config::ApiConfig;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub pipeline: NormalizationPipeline,
    pub config: ApiConfig,
    /// Probed by the readiness endpoint
    pub health_checks: Arc<Vec<Arc<dyn HealthCheckable>>>,
}

impl AppState {
    pub fn new(pipeline: NormalizationPipeline, config: ApiConfig) -> Self {
        Self {
            pipeline,
            config,
            health_checks: Arc::new(Vec::new()),
        }
    }

    pub fn with_health_checks(mut self, checks: Vec<Arc<dyn HealthCheckable>>) -> Self {
        self.health_checks = Arc::new(checks);
        self
    }

    /// Wires the PostgreSQL, filesystem and HTTP adapters into a pipeline
    ///
    /// # Arguments
    ///
    /// * `pool` - Migrated PostgreSQL pool
    /// * `config` - Validated API configuration
    pub fn from_config(pool: PgPool, config: ApiConfig) -> Result<Self, PortError> {
        let claims = Arc::new(PostgresClaimAdapter::new(pool.clone()));
        let objects = Arc::new(FsObjectStore::new(&config.object_store_root));

        let mut detector_config = TextDetectionConfig::new(&config.text_detector_url)
            .timeout(config.pipeline_config().stage_timeout);
        if let Some(key) = &config.text_detector_api_key {
            detector_config = detector_config.api_key(key);
        }
        let detector = Arc::new(HttpTextDetector::new(detector_config)?);

        let deps = NormalizationDeps {
            claims: claims.clone(),
            denials: claims.clone(),
            patients: Arc::new(PostgresPatientAdapter::new(pool.clone())),
            payers: Arc::new(PostgresPayerAdapter::new(pool.clone())),
            objects: objects.clone(),
            text_detector: detector.clone(),
            audit: Arc::new(PostgresAuditSink::new(pool)),
        };
        let pipeline = NormalizationPipeline::new(deps, config.pipeline_config());

        let checks: Vec<Arc<dyn HealthCheckable>> = vec![
            claims as Arc<dyn HealthCheckable>,
            objects as Arc<dyn HealthCheckable>,
            detector as Arc<dyn HealthCheckable>,
        ];
        Ok(Self::new(pipeline, config).with_health_checks(checks))
    }
}
