//! Error types for liteorm

use rusqlite::ffi;
use thiserror::Error;

/// Result type alias for liteorm operations
pub type OrmResult<T> = Result<T, OrmError>;

/// Error types for database operations
///
/// The variants fall into the four families callers care about:
/// connection state, local validation (nothing was sent to the engine),
/// engine rejections (including the constraint sub-kinds), and lookups that
/// found nothing.
#[derive(Debug, Error)]
pub enum OrmError {
    /// Operation attempted on a closed or never-opened handle
    #[error("Connection error: {0}")]
    Connection(String),

    /// Statement rejected before reaching the engine
    #[error("Validation error: {0}")]
    Validation(String),

    /// The engine rejected the statement or the database could not be opened
    #[error("Engine error: {0}")]
    Engine(#[from] rusqlite::Error),

    /// Unique or primary key constraint violation
    #[error("Unique constraint violation: {0}")]
    UniqueViolation(String),

    /// Foreign key constraint violation
    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    /// Check constraint violation
    #[error("Check constraint violation: {0}")]
    CheckViolation(String),

    /// NOT NULL constraint violation
    #[error("Not null constraint violation: {0}")]
    NotNullViolation(String),

    /// Table or row not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl OrmError {
    /// Create a connection error
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Check if this is a connection error
    pub fn is_connection_error(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// Check if this is a validation error
    pub fn is_validation_error(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if the engine produced this error (including constraint violations)
    pub fn is_engine_error(&self) -> bool {
        matches!(
            self,
            Self::Engine(_)
                | Self::UniqueViolation(_)
                | Self::ForeignKeyViolation(_)
                | Self::CheckViolation(_)
                | Self::NotNullViolation(_)
        )
    }

    /// Check if this is a unique violation error
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, Self::UniqueViolation(_))
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Parse a rusqlite error into a more specific OrmError
    pub fn from_engine_error(err: rusqlite::Error) -> Self {
        let classified = match &err {
            rusqlite::Error::SqliteFailure(failure, message)
                if failure.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                let message = message.clone().unwrap_or_else(|| failure.to_string());
                match failure.extended_code {
                    ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
                        Some(Self::UniqueViolation(message))
                    }
                    ffi::SQLITE_CONSTRAINT_FOREIGNKEY => Some(Self::ForeignKeyViolation(message)),
                    ffi::SQLITE_CONSTRAINT_CHECK => Some(Self::CheckViolation(message)),
                    ffi::SQLITE_CONSTRAINT_NOTNULL => Some(Self::NotNullViolation(message)),
                    _ => None,
                }
            }
            _ => None,
        };
        classified.unwrap_or(Self::Engine(err))
    }
}

impl From<serde_json::Error> for OrmError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
