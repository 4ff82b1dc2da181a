//! Error types for [`DataAccess`](crate::DataAccess).
//!
//! Configuration and statement problems are reported before any connection
//! is opened. Backend failures are rolled back first and then surface as
//! [`DbError::QueryExecution`]; nothing in this crate panics on a bad query.

use dbal_sql::SqlError;
use thiserror::Error;

/// Coarse classification of a [`DbError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A required argument was missing or invalid.
    Configuration,
    /// The backend is unknown or its driver was not compiled in.
    UnsupportedBackend,
    /// The backend rejected the statement or could not be reached.
    QueryExecution,
}

#[derive(Debug, Error)]
pub enum DbError {
    /// Missing backend or database name.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Table, column, SQL text or field list could not be rendered.
    #[error("configuration error: {0}")]
    Statement(#[from] SqlError),

    #[error("unsupported backend: {0}")]
    UnsupportedBackend(String),

    /// The backend failed. `rolled_back` is false when the failure happened
    /// before a transaction was open (e.g. connecting) or the ROLLBACK itself
    /// failed.
    #[error("SQL Error: {source}")]
    QueryExecution {
        #[source]
        source: sqlx::Error,
        rolled_back: bool,
    },
}

impl DbError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DbError::Configuration(_) | DbError::Statement(_) => ErrorKind::Configuration,
            DbError::UnsupportedBackend(_) => ErrorKind::UnsupportedBackend,
            DbError::QueryExecution { .. } => ErrorKind::QueryExecution,
        }
    }

    pub(crate) fn connect(source: sqlx::Error) -> Self {
        DbError::QueryExecution {
            source,
            rolled_back: false,
        }
    }

    pub(crate) fn failed(source: sqlx::Error, rolled_back: bool) -> Self {
        DbError::QueryExecution {
            source,
            rolled_back,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds() {
        assert_eq!(
            DbError::Configuration("x".into()).kind(),
            ErrorKind::Configuration
        );
        assert_eq!(
            DbError::from(SqlError::MissingSql).kind(),
            ErrorKind::Configuration
        );
        assert_eq!(
            DbError::UnsupportedBackend("Oracle".into()).kind(),
            ErrorKind::UnsupportedBackend
        );
        assert_eq!(
            DbError::failed(sqlx::Error::RowNotFound, true).kind(),
            ErrorKind::QueryExecution
        );
    }

    #[test]
    fn query_errors_read_like_driver_messages() {
        let err = DbError::failed(
            sqlx::Error::Protocol("no such table: nope".into()),
            true,
        );
        assert!(err.to_string().starts_with("SQL Error: "));
        assert!(err.to_string().contains("no such table: nope"));
    }
}
