use async_trait::async_trait;
use chrono::{DateTime, Utc};
use redis::{self, AsyncCommands};

use crate::config::{clamp_ttl, expiry_after};

use super::errors::StorageError;
use super::types::{SessionBackend, StoredSession};

const SESSION_PREFIX: &str = "session";

/// Session table kept in redis.
///
/// Expiry is enforced by the key TTL: `insert` uses `SET .. EX` and
/// `get_and_renew` uses `GETEX .. EX`, so lookup and renewal are one command.
pub struct RedisSessionBackend {
    client: redis::Client,
}

impl RedisSessionBackend {
    pub fn open(url: &str) -> Result<Self, StorageError> {
        let client = redis::Client::open(url)?;
        Ok(Self { client })
    }

    fn make_key(key: &str) -> String {
        format!("{SESSION_PREFIX}:{key}")
    }
}

#[async_trait]
impl SessionBackend for RedisSessionBackend {
    async fn init(&self) -> Result<(), StorageError> {
        // Verify the connection works
        let _conn = self.client.get_multiplexed_async_connection().await?;
        Ok(())
    }

    async fn insert(
        &self,
        key: &str,
        session: StoredSession,
        ttl: u64,
    ) -> Result<(), StorageError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        let key = Self::make_key(key);
        let value = serde_json::to_string(&session)?;
        let _: () = conn.set_ex(&key, value, clamp_ttl(ttl)).await?;
        Ok(())
    }

    async fn get_and_renew(
        &self,
        key: &str,
        now: DateTime<Utc>,
        ttl: u64,
    ) -> Result<Option<StoredSession>, StorageError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        let key = Self::make_key(key);
        let value: Option<String> = redis::cmd("GETEX")
            .arg(&key)
            .arg("EX")
            .arg(clamp_ttl(ttl))
            .query_async(&mut conn)
            .await?;

        match value {
            Some(v) => {
                let mut session: StoredSession = serde_json::from_str(&v)?;
                session.expires_at = expiry_after(now, ttl);
                Ok(Some(session))
            }
            None => Ok(None),
        }
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        let key = Self::make_key(key);
        let _: () = conn.del(&key).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_make_key() {
        assert_eq!(RedisSessionBackend::make_key("abc"), "session:abc");
    }

    #[test]
    fn test_open_rejects_malformed_url() {
        assert!(RedisSessionBackend::open("not a url").is_err());
    }

    #[test]
    fn test_open_accepts_url_without_connecting() {
        assert!(RedisSessionBackend::open("redis://127.0.0.1:6379").is_ok());
    }
}
