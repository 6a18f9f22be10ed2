//! # Database Error Types
//!
//! Error types for database operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbError::Database  ← transparent, message and source untouched        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  HTTP layer decides the status code                                    │
//! │  (is_foreign_key_violation() etc. help without unwrapping)             │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Repositories never retry and never reinterpret a database error. The
//! other variants cover failures raised before a statement reaches SQLite.

use sqlx::error::ErrorKind;
use thiserror::Error;

/// Database operation errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// Error reported by sqlx / SQLite, passed through verbatim.
    ///
    /// ## When This Occurs
    /// - Constraint violations (unknown user_id / product_id on insert)
    /// - Connection loss, pool timeout
    /// - Row decoding failures
    #[error(transparent)]
    Database(#[from] sqlx::Error),

    /// An IN-list was asked to expand zero values.
    ///
    /// `IN ()` is not valid SQL, so the query builder refuses to render it.
    #[error("IN list for {column} has no values")]
    EmptyInList { column: String },

    /// A bind value could not be encoded into the argument buffer.
    #[error("Failed to bind query argument: {0}")]
    Bind(String),

    /// Database connection failed.
    ///
    /// ## When This Occurs
    /// - Database file can't be created
    /// - File permissions issue
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),
}

impl DbError {
    /// True when SQLite rejected a row for referencing a missing parent.
    pub fn is_foreign_key_violation(&self) -> bool {
        matches!(
            self.database_error_kind(),
            Some(ErrorKind::ForeignKeyViolation)
        )
    }

    /// True when SQLite rejected a row for a duplicate key.
    pub fn is_unique_violation(&self) -> bool {
        matches!(self.database_error_kind(), Some(ErrorKind::UniqueViolation))
    }

    fn database_error_kind(&self) -> Option<ErrorKind> {
        match self {
            DbError::Database(sqlx::Error::Database(db_err)) => Some(db_err.kind()),
            _ => None,
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;
