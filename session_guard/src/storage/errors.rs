use thiserror::Error;

/// Failures of a session backend.
#[derive(Debug, Error, Clone)]
pub enum StorageError {
    /// The backend could not be reached or rejected a command
    #[error("Session backend error: {0}")]
    Backend(String),

    /// A stored record could not be encoded or decoded
    #[error("Session record encoding error: {0}")]
    Codec(String),

    /// `SESSION_STORE_TYPE` names no known backend
    #[error("Unsupported session store type: {0}. Supported types are 'memory' and 'redis'")]
    UnsupportedBackend(String),
}

impl From<redis::RedisError> for StorageError {
    fn from(err: redis::RedisError) -> Self {
        Self::Backend(err.to_string())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        Self::Codec(err.to_string())
    }
}
