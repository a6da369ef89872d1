use thiserror::Error;

/// Validation errors for model values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// When an identifier is not a 24-hex-character object id.
    #[error("'{value}' is not a valid id")]
    InvalidId {
        /// Offending value.
        value: String,
    },
    /// When a required field is empty.
    #[error("{field} must not be empty")]
    Empty {
        /// Field name that failed validation.
        field: &'static str,
    },
    /// When a combination of fields is not allowed.
    #[error("{field} is not allowed: {reason}")]
    NotAllowed {
        /// Field name that failed validation.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}
