use thiserror::Error;

/// Errors from the key-value layer.
#[derive(Error, Debug)]
pub enum KvError {
    /// The connection or the server failed.
    #[error("transport error: {0}")]
    Transport(String),
    /// The pool was closed.
    #[error("key-value pool is closed")]
    Closed,
    /// A transaction guard did not hold; nothing was written.
    #[error("transaction rejected: {0}")]
    Rejected(#[source] Rejection),
}

/// Why a transaction guard failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// The guarded key no longer exists.
    #[error("{key} is missing")]
    Missing {
        /// Guarded key.
        key: String,
    },
    /// The guarded key holds a different value than expected.
    #[error("{key} changed concurrently")]
    Changed {
        /// Guarded key.
        key: String,
    },
    /// The hash field is owned by another record.
    #[error("{key}[{field}] is taken")]
    FieldTaken {
        /// Hash key.
        key: String,
        /// Hash field.
        field: String,
    },
}

impl From<redis::RedisError> for KvError {
    fn from(err: redis::RedisError) -> Self {
        Self::Transport(err.to_string())
    }
}

impl From<KvError> for edgevault_store::StoreError {
    fn from(err: KvError) -> Self {
        Self::unexpected(err)
    }
}
