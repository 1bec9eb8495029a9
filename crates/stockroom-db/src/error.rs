//! # Database Error Types
//!
//! Error types for database operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite / MySQL error (sqlx::Error)                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbError (this module) ← keeps the engine's own message                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ApiError (api-server) ← 500 + {success:false, error}                  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Constraint violations are not classified: a NOT NULL failure and a lost
//! connection both surface as [`DbError::QueryFailed`] carrying whatever the
//! engine said.

use thiserror::Error;

/// Database operation errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// Database connection failed.
    ///
    /// ## When This Occurs
    /// - SQLite file can't be created (permissions, missing directory)
    /// - MySQL server unreachable or credentials rejected
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Schema bootstrap failed.
    #[error("Schema setup failed: {0}")]
    SchemaFailed(String),

    /// Query execution failed.
    ///
    /// ## When This Occurs
    /// - Constraint violation (NOT NULL, UNIQUE, FOREIGN KEY)
    /// - SQL syntax error
    /// - Connection dropped mid-query
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// A row came back in a shape the repository didn't expect.
    #[error("Cannot decode column '{column}': {reason}")]
    Decode { column: String, reason: String },

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,
}

impl DbError {
    /// Creates a Decode error for a given column.
    pub fn decode(column: impl Into<String>, reason: impl Into<String>) -> Self {
        DbError::Decode {
            column: column.into(),
            reason: reason.into(),
        }
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::Database       → DbError::QueryFailed(engine message)
/// sqlx::Error::PoolTimedOut   → DbError::PoolExhausted
/// sqlx::Error::PoolClosed     → DbError::ConnectionFailed
/// Other                       → DbError::QueryFailed
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => DbError::QueryFailed(db_err.message().to_string()),
            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,
            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),
            _ => DbError::QueryFailed(err.to_string()),
        }
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;
