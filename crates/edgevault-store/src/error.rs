//! Error types for store operations.

use edgevault_model::ValidationError;
use thiserror::Error;

/// Errors every backend reports, whatever its native failure looked like.
#[derive(Error, Debug)]
pub enum StoreError {
    /// No record matched the id or unique field.
    #[error("{collection} not found: {key}")]
    NotFound {
        /// Collection that was searched.
        collection: &'static str,
        /// Id or field value that missed.
        key: String,
    },
    /// The id is not a 24-hex-character object id.
    #[error("invalid id: {0}")]
    InvalidId(String),
    /// A unique field value is already taken.
    #[error("{collection} with {field} '{value}' already exists")]
    DuplicateName {
        /// Collection holding the conflicting record.
        collection: &'static str,
        /// Unique field.
        field: String,
        /// Conflicting value.
        value: String,
    },
    /// The configured backend kind is unknown or not compiled in.
    #[error("unsupported backend: {0}")]
    UnsupportedBackend(String),
    /// Transport, serialization or any other failure.
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

/// Kind of a [`StoreError`], for callers that branch on kind only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// See [`StoreError::NotFound`].
    NotFound,
    /// See [`StoreError::InvalidId`].
    InvalidId,
    /// See [`StoreError::DuplicateName`].
    DuplicateName,
    /// See [`StoreError::UnsupportedBackend`].
    UnsupportedBackend,
    /// See [`StoreError::Unexpected`].
    Unexpected,
}

impl StoreError {
    /// Creates a not-found error.
    pub fn not_found(collection: &'static str, key: impl Into<String>) -> Self {
        Self::NotFound {
            collection,
            key: key.into(),
        }
    }

    /// Creates a duplicate-name error.
    pub fn duplicate(
        collection: &'static str,
        field: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::DuplicateName {
            collection,
            field: field.into(),
            value: value.into(),
        }
    }

    /// Creates an unexpected error from anything printable.
    pub fn unexpected(err: impl std::fmt::Display) -> Self {
        Self::Unexpected(err.to_string())
    }

    /// Returns the kind of the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::InvalidId(_) => ErrorKind::InvalidId,
            Self::DuplicateName { .. } => ErrorKind::DuplicateName,
            Self::UnsupportedBackend(_) => ErrorKind::UnsupportedBackend,
            Self::Unexpected(_) => ErrorKind::Unexpected,
        }
    }
}

impl From<ValidationError> for StoreError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::InvalidId { value } => Self::InvalidId(value),
            other => Self::Unexpected(other.to_string()),
        }
    }
}

impl From<bson::ser::Error> for StoreError {
    fn from(err: bson::ser::Error) -> Self {
        Self::Unexpected(format!("encode record: {err}"))
    }
}

impl From<bson::de::Error> for StoreError {
    fn from(err: bson::de::Error) -> Self {
        Self::Unexpected(format!("decode record: {err}"))
    }
}
