//! Pipeline configuration

use std::time::Duration;

/// Deadlines applied to a normalization run
///
/// # Example
///
/// ```rust
/// use domain_normalization::PipelineConfig;
/// use std::time::Duration;
///
/// let config = PipelineConfig::new()
///     .stage_timeout(Duration::from_secs(10))
///     .cleanup_timeout(Duration::from_secs(2));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Budget for the whole run, from claim lookup to the status write
    pub stage_timeout: Duration,
    /// Budget for the manual-review mark and for each audit write
    pub cleanup_timeout: Duration,
}

impl PipelineConfig {
    pub fn new() -> Self {
        Self {
            stage_timeout: Duration::from_secs(30),
            cleanup_timeout: Duration::from_secs(5),
        }
    }

    /// Sets the run budget (default: 30s)
    pub fn stage_timeout(mut self, timeout: Duration) -> Self {
        self.stage_timeout = timeout;
        self
    }

    /// Sets the cleanup budget (default: 5s)
    pub fn cleanup_timeout(mut self, timeout: Duration) -> Self {
        self.cleanup_timeout = timeout;
        self
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::new()
    }
}
