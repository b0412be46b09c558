use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::Mutex;

use crate::config::expiry_after;

use super::errors::StorageError;
use super::types::{SessionBackend, StoredSession};

const SESSION_PREFIX: &str = "session";

/// Process-local session table guarded by a single mutex.
///
/// Expired entries are only dropped when they are looked up again.
pub struct InMemorySessionBackend {
    entry: Mutex<HashMap<String, StoredSession>>,
}

impl InMemorySessionBackend {
    pub fn new() -> Self {
        tracing::info!("Creating new in-memory session store");
        Self {
            entry: Mutex::new(HashMap::new()),
        }
    }

    fn make_key(key: &str) -> String {
        format!("{SESSION_PREFIX}:{key}")
    }

    #[cfg(test)]
    pub(crate) async fn len(&self) -> usize {
        self.entry.lock().await.len()
    }
}

impl Default for InMemorySessionBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionBackend for InMemorySessionBackend {
    async fn init(&self) -> Result<(), StorageError> {
        Ok(()) // Nothing to initialize for in-memory store
    }

    async fn insert(
        &self,
        key: &str,
        session: StoredSession,
        _ttl: u64,
    ) -> Result<(), StorageError> {
        let key = Self::make_key(key);
        self.entry.lock().await.insert(key, session);
        Ok(())
    }

    async fn get_and_renew(
        &self,
        key: &str,
        now: DateTime<Utc>,
        ttl: u64,
    ) -> Result<Option<StoredSession>, StorageError> {
        let key = Self::make_key(key);
        let mut entry = self.entry.lock().await;

        let expired = match entry.get(&key) {
            Some(session) => now > session.expires_at,
            None => return Ok(None),
        };
        if expired {
            entry.remove(&key);
            return Ok(None);
        }

        let Some(session) = entry.get_mut(&key) else {
            return Ok(None);
        };
        session.expires_at = expiry_after(now, ttl);
        Ok(Some(session.clone()))
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let key = Self::make_key(key);
        self.entry.lock().await.remove(&key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MAX_SESSION_TTL_SECONDS;
    use chrono::Duration;
    use std::sync::Arc;

    fn session(username: &str, expires_at: DateTime<Utc>) -> StoredSession {
        StoredSession {
            username: username.to_string(),
            expires_at,
        }
    }

    #[test]
    fn test_make_key() {
        assert_eq!(InMemorySessionBackend::make_key("abc"), "session:abc");
    }

    #[tokio::test]
    async fn test_init() {
        let store = InMemorySessionBackend::new();
        assert!(store.init().await.is_ok());
    }

    #[tokio::test]
    async fn test_get_unknown_key() {
        let store = InMemorySessionBackend::new();
        let result = store.get_and_renew("nope", Utc::now(), 60).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_get_renews_expiry() {
        let store = InMemorySessionBackend::new();
        let now = Utc::now();
        store
            .insert("k", session("alice", now + Duration::seconds(10)), 10)
            .await
            .unwrap();

        let later = now + Duration::seconds(5);
        let renewed = store.get_and_renew("k", later, 10).await.unwrap().unwrap();
        assert_eq!(renewed.username, "alice");
        assert_eq!(renewed.expires_at, later + Duration::seconds(10));
    }

    #[tokio::test]
    async fn test_expired_entry_is_removed_on_access() {
        let store = InMemorySessionBackend::new();
        let now = Utc::now();
        store
            .insert("k", session("alice", now - Duration::seconds(1)), 10)
            .await
            .unwrap();
        assert_eq!(store.len().await, 1);

        assert!(store.get_and_renew("k", now, 10).await.unwrap().is_none());
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn test_entry_valid_at_exact_expiry() {
        let store = InMemorySessionBackend::new();
        let now = Utc::now();
        store.insert("k", session("alice", now), 10).await.unwrap();

        assert!(store.get_and_renew("k", now, 10).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_renew_with_oversized_ttl_stays_in_future() {
        let store = InMemorySessionBackend::new();
        let now = Utc::now();
        store
            .insert("k", session("alice", now + Duration::seconds(10)), 10)
            .await
            .unwrap();

        let renewed = store
            .get_and_renew("k", now, u64::MAX)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            renewed.expires_at,
            now + Duration::seconds(MAX_SESSION_TTL_SECONDS as i64)
        );
        assert!(store.get_and_renew("k", now, 10).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let store = InMemorySessionBackend::new();
        store
            .insert("k", session("alice", Utc::now()), 10)
            .await
            .unwrap();

        assert!(store.remove("k").await.is_ok());
        assert!(store.remove("k").await.is_ok());
        assert!(store.remove("never-existed").await.is_ok());
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn test_concurrent_access_on_distinct_keys() {
        let store = Arc::new(InMemorySessionBackend::new());
        let expires_at = Utc::now() + Duration::seconds(60);

        let mut handles = Vec::new();
        for i in 0..32 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                let key = format!("key-{i}");
                store
                    .insert(&key, session(&format!("user-{i}"), expires_at), 60)
                    .await
                    .unwrap();
                let found = store
                    .get_and_renew(&key, Utc::now(), 60)
                    .await
                    .unwrap()
                    .unwrap();
                assert_eq!(found.username, format!("user-{i}"));
                if i % 2 == 0 {
                    store.remove(&key).await.unwrap();
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(store.len().await, 16);
    }
}
