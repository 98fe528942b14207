//! Database error types
//!
//! Repositories return [`DatabaseError`]; the adapters hand it to the domain
//! as a `PortError` through the `From` impl at the bottom of this module.

use thiserror::Error;

use core_kernel::PortError;

/// PostgreSQL SQLSTATE codes the repositories care about
mod sqlstate {
    pub const UNIQUE_VIOLATION: &str = "23505";
    pub const FOREIGN_KEY_VIOLATION: &str = "23503";
    pub const CHECK_VIOLATION: &str = "23514";
    pub const QUERY_CANCELED: &str = "57014";
}

/// Errors raised by the claims, party and agent log repositories
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// An update matched no row
    #[error("{entity} with id '{id}' not found")]
    NotFound { entity: &'static str, id: String },

    #[error(transparent)]
    Sql(#[from] sqlx::Error),
}

impl DatabaseError {
    pub fn not_found(entity: &'static str, id: impl std::fmt::Display) -> Self {
        DatabaseError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, DatabaseError::NotFound { .. } | DatabaseError::Sql(sqlx::Error::RowNotFound))
    }

    /// SQLSTATE of a server-side failure
    fn sqlstate(&self) -> Option<String> {
        match self {
            DatabaseError::Sql(sqlx::Error::Database(db_err)) => db_err.code().map(|c| c.into_owned()),
            _ => None,
        }
    }
}

/// Translates a database error into the port vocabulary
///
/// | Database error | Port error |
/// |----------------|------------|
/// | no matching row | `NotFound` |
/// | unique, foreign key or check violation | `Conflict` |
/// | statement timeout | `Timeout` |
/// | unreachable server, exhausted pool, closed pool | `Connection` |
/// | undecodable column | `Transformation` |
/// | anything else | `Internal` |
impl From<DatabaseError> for PortError {
    fn from(error: DatabaseError) -> Self {
        if let DatabaseError::NotFound { entity, id } = &error {
            return PortError::not_found(*entity, id);
        }

        match error.sqlstate().as_deref() {
            Some(sqlstate::UNIQUE_VIOLATION | sqlstate::FOREIGN_KEY_VIOLATION | sqlstate::CHECK_VIOLATION) => {
                return PortError::Conflict {
                    message: error.to_string(),
                }
            }
            Some(sqlstate::QUERY_CANCELED) => {
                return PortError::Timeout {
                    operation: "database statement".to_string(),
                    duration_ms: 0,
                }
            }
            _ => {}
        }

        match error {
            DatabaseError::Sql(sqlx::Error::RowNotFound) => PortError::not_found("Record", "query"),
            DatabaseError::Sql(
                e @ (sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) | sqlx::Error::Tls(_)),
            ) => PortError::Connection {
                message: e.to_string(),
                source: Some(Box::new(e)),
            },
            e @ DatabaseError::ConnectionFailed(_) => PortError::Connection {
                message: e.to_string(),
                source: None,
            },
            DatabaseError::Sql(e @ (sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_))) => {
                PortError::Transformation { message: e.to_string() }
            }
            DatabaseError::Sql(e) => PortError::Internal {
                message: e.to_string(),
                source: Some(Box::new(e)),
            },
            other => PortError::Internal {
                message: other.to_string(),
                source: None,
            },
        }
    }
}
