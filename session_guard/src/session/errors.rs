use thiserror::Error;

use crate::storage::StorageError;
use crate::utils::UtilError;

#[derive(Debug, Error, Clone)]
pub enum SessionError {
    #[error("Storage error: {0}")]
    Storage(String),

    /// Rejected CSRF check. The message is identical for every cause.
    #[error("CSRF token missing or mismatch")]
    CsrfToken,

    /// Error from utils operations
    #[error("Utils error: {0}")]
    Utils(#[from] UtilError),
}

impl From<StorageError> for SessionError {
    fn from(err: StorageError) -> Self {
        Self::Storage(err.to_string())
    }
}
