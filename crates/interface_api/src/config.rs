//! API configuration
//!
//! Loaded from environment variables prefixed `NORMALIZER_`, e.g.
//! `NORMALIZER_PORT=9000` or `NORMALIZER_TEXT_DETECTOR_URL=http://ocr:8000/detect`.
//! Unset keys fall back to [`ApiConfig::default`].

use serde::Deserialize;
use std::time::Duration;

use core_kernel::CoreError;
use domain_normalization::PipelineConfig;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "NORMALIZER";

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl LogFormat {
    fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Text => "text",
            LogFormat::Json => "json",
        }
    }
}

/// API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Database URL
    pub database_url: String,
    /// Maximum pooled database connections
    pub db_max_connections: u32,
    /// Log level, overridden by `RUST_LOG`
    pub log_level: String,
    pub log_format: LogFormat,
    /// Directory holding one subdirectory per storage bucket
    pub object_store_root: String,
    /// Text detection endpoint
    pub text_detector_url: String,
    #[serde(default)]
    pub text_detector_api_key: Option<String>,
    /// Deadline for one normalization run
    pub stage_timeout_secs: u64,
    /// Budget for manual-review marking and audit writes after a failure
    pub cleanup_timeout_secs: u64,
    /// Largest accepted batch
    pub max_batch_size: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            database_url: "postgres://localhost/claims".to_string(),
            db_max_connections: 10,
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
            object_store_root: "./data/objects".to_string(),
            text_detector_url: "http://localhost:8081/detect".to_string(),
            text_detector_api_key: None,
            stage_timeout_secs: 30,
            cleanup_timeout_secs: 5,
            max_batch_size: 50,
        }
    }
}

impl ApiConfig {
    /// Loads configuration from the process environment
    pub fn from_env() -> Result<Self, config::ConfigError> {
        Self::load(config::Environment::with_prefix(ENV_PREFIX))
    }

    fn load(environment: config::Environment) -> Result<Self, config::ConfigError> {
        let defaults = ApiConfig::default();

        config::Config::builder()
            .set_default("host", defaults.host)?
            .set_default("port", i64::from(defaults.port))?
            .set_default("database_url", defaults.database_url)?
            .set_default("db_max_connections", i64::from(defaults.db_max_connections))?
            .set_default("log_level", defaults.log_level)?
            .set_default("log_format", defaults.log_format.as_str())?
            .set_default("object_store_root", defaults.object_store_root)?
            .set_default("text_detector_url", defaults.text_detector_url)?
            .set_default("stage_timeout_secs", defaults.stage_timeout_secs as i64)?
            .set_default("cleanup_timeout_secs", defaults.cleanup_timeout_secs as i64)?
            .set_default("max_batch_size", defaults.max_batch_size as i64)?
            .add_source(environment.try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// Checks values the types cannot express
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.database_url.trim().is_empty() {
            return Err(CoreError::configuration("database_url must be set"));
        }
        if !(self.text_detector_url.starts_with("http://") || self.text_detector_url.starts_with("https://")) {
            return Err(CoreError::configuration(format!(
                "text_detector_url '{}' is not an http(s) URL",
                self.text_detector_url
            )));
        }
        if self.stage_timeout_secs == 0 {
            return Err(CoreError::configuration("stage_timeout_secs must be at least 1"));
        }
        if self.max_batch_size == 0 {
            return Err(CoreError::configuration("max_batch_size must be at least 1"));
        }
        if self.db_max_connections == 0 {
            return Err(CoreError::configuration("db_max_connections must be at least 1"));
        }
        Ok(())
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Pipeline timeouts derived from this configuration
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig::new()
            .stage_timeout(Duration::from_secs(self.stage_timeout_secs))
            .cleanup_timeout(Duration::from_secs(self.cleanup_timeout_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<ApiConfig, config::ConfigError> {
        let source: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ApiConfig::load(config::Environment::with_prefix(ENV_PREFIX).source(Some(source)))
    }

    #[test]
    fn test_defaults_when_environment_empty() {
        let config = load(&[]).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.max_batch_size, 50);
        assert_eq!(config.log_format, LogFormat::Text);
        assert!(config.text_detector_api_key.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_prefixed_variables_override_defaults() {
        let config = load(&[
            ("NORMALIZER_PORT", "9000"),
            ("NORMALIZER_LOG_FORMAT", "json"),
            ("NORMALIZER_STAGE_TIMEOUT_SECS", "12"),
            ("NORMALIZER_TEXT_DETECTOR_API_KEY", "secret"),
        ])
        .unwrap();

        assert_eq!(config.port, 9000);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.text_detector_api_key.as_deref(), Some("secret"));
        assert_eq!(config.pipeline_config().stage_timeout, Duration::from_secs(12));
    }

    #[test]
    fn test_validation_rejects_zero_batch() {
        let config = ApiConfig {
            max_batch_size: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(CoreError::Configuration(_))));
    }

    #[test]
    fn test_validation_rejects_non_http_detector() {
        let config = ApiConfig {
            text_detector_url: "ftp://ocr".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_server_addr() {
        assert_eq!(ApiConfig::default().server_addr(), "0.0.0.0:8080");
    }
}
