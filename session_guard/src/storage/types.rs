use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::errors::StorageError;

/// Session record as held by a backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    pub username: String,
    pub expires_at: DateTime<Utc>,
}

/// Keyed storage for session records.
///
/// Every method is a single atomic step: concurrent calls on the same key
/// observe each other's effects in some serial order.
#[async_trait]
pub trait SessionBackend: Send + Sync + 'static {
    /// Verify the backend is reachable. Called once when the store is built.
    async fn init(&self) -> Result<(), StorageError>;

    /// Insert or replace the record under `key`.
    async fn insert(
        &self,
        key: &str,
        session: StoredSession,
        ttl: u64,
    ) -> Result<(), StorageError>;

    /// Look up `key` and extend its lifetime in the same step.
    ///
    /// Returns `None` if the key is unknown. A record whose expiry is before
    /// `now` is removed and `None` is returned. Otherwise the expiry becomes
    /// `now + ttl` and the renewed record is returned.
    async fn get_and_renew(
        &self,
        key: &str,
        now: DateTime<Utc>,
        ttl: u64,
    ) -> Result<Option<StoredSession>, StorageError>;

    /// Remove `key`. Removing an unknown key is not an error.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}
