//! Connection pool and schema setup
//!
//! Every connection identifies itself to PostgreSQL with an application name
//! and carries a server-side statement timeout, so a stuck query cannot
//! outlive the pipeline deadline that issued it.

use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

use crate::error::DatabaseError;

/// Shown in `pg_stat_activity.application_name`
pub const APPLICATION_NAME: &str = "claim-normalizer";

/// Pool settings for the normalization service
///
/// # Example
///
/// ```rust
/// use infra_db::DatabaseConfig;
/// use std::time::Duration;
///
/// let config = DatabaseConfig::new("postgres://localhost/claims")
///     .max_connections(20)
///     .statement_timeout(Duration::from_secs(10));
/// ```
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    /// Upper bound on concurrent normalization writes
    pub max_connections: u32,
    /// How long a run waits for a free connection
    pub acquire_timeout: Duration,
    /// Server-side limit for any single statement
    pub statement_timeout: Duration,
    pub application_name: String,
}

impl DatabaseConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 10,
            acquire_timeout: Duration::from_secs(5),
            statement_timeout: Duration::from_secs(30),
            application_name: APPLICATION_NAME.to_string(),
        }
    }

    /// Sets the pool size (default: 10)
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets the connection wait (default: 5s)
    pub fn acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }

    /// Sets the per-statement limit (default: 30s)
    pub fn statement_timeout(mut self, timeout: Duration) -> Self {
        self.statement_timeout = timeout;
        self
    }

    /// Parses the URL and applies the session settings
    pub fn connect_options(&self) -> Result<PgConnectOptions, DatabaseError> {
        let options = PgConnectOptions::from_str(&self.url)
            .map_err(|e| DatabaseError::ConnectionFailed(format!("invalid database url: {}", e)))?;
        Ok(options
            .application_name(&self.application_name)
            .options([("statement_timeout", self.statement_timeout.as_millis().to_string())]))
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self::new("postgres://localhost/claims")
    }
}

/// Connects the pool and checks out one connection
///
/// # Errors
///
/// Returns `DatabaseError::ConnectionFailed` for an unparseable URL or an
/// unreachable server
pub async fn create_pool(config: DatabaseConfig) -> Result<PgPool, DatabaseError> {
    info!(
        max_connections = config.max_connections,
        statement_timeout_ms = config.statement_timeout.as_millis() as u64,
        "Connecting to claims database"
    );

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect_with(config.connect_options()?)
        .await
        .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

    Ok(pool)
}

/// Applies the claims, party and agent log schema
pub async fn run_migrations(pool: &PgPool) -> Result<(), DatabaseError> {
    sqlx::migrate!("../../migrations")
        .run(pool)
        .await
        .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
    info!("Database migrations applied");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DatabaseConfig::default();
        assert_eq!(config.url, "postgres://localhost/claims");
        assert_eq!(config.max_connections, 10);
        assert_eq!(config.application_name, APPLICATION_NAME);
    }

    #[test]
    fn test_builder() {
        let config = DatabaseConfig::new("postgres://db/claims")
            .max_connections(4)
            .acquire_timeout(Duration::from_millis(250))
            .statement_timeout(Duration::from_secs(2));

        assert_eq!(config.max_connections, 4);
        assert_eq!(config.acquire_timeout, Duration::from_millis(250));
        assert_eq!(config.statement_timeout, Duration::from_secs(2));
    }

    #[test]
    fn test_connect_options_name_the_service() {
        let options = DatabaseConfig::new("postgres://normalizer@db:5432/claims")
            .connect_options()
            .unwrap();
        assert_eq!(options.get_application_name(), Some(APPLICATION_NAME));
        assert_eq!(options.get_database(), Some("claims"));
    }

    #[test]
    fn test_bad_url_is_a_connection_failure() {
        let err = DatabaseConfig::new("mysql://db/claims").connect_options().unwrap_err();
        assert!(matches!(err, DatabaseError::ConnectionFailed(_)));
    }
}
