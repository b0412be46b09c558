//! Shared fixtures for unit tests

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::storage::{SessionBackend, StorageError, StoredSession};

/// Backend whose every operation fails, standing in for an unreachable store.
pub(crate) struct FailingBackend;

fn unavailable() -> StorageError {
    StorageError::Backend("unavailable".to_string())
}

#[async_trait]
impl SessionBackend for FailingBackend {
    async fn init(&self) -> Result<(), StorageError> {
        Ok(())
    }

    async fn insert(&self, _: &str, _: StoredSession, _: u64) -> Result<(), StorageError> {
        Err(unavailable())
    }

    async fn get_and_renew(
        &self,
        _: &str,
        _: DateTime<Utc>,
        _: u64,
    ) -> Result<Option<StoredSession>, StorageError> {
        Err(unavailable())
    }

    async fn remove(&self, _: &str) -> Result<(), StorageError> {
        Err(unavailable())
    }
}
