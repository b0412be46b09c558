use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::clock::Clock;
use crate::config::{clamp_ttl, expiry_after};
use crate::session::errors::SessionError;
use crate::session::types::Session;
use crate::storage::{SessionBackend, StoredSession};
use crate::utils::token_prefix;

use super::token::new_session_id;

/// Owner of all server-side sessions.
///
/// Expiry is lazy: nothing is swept in the background, a record past its
/// expiry is dropped the next time it is looked up. Lookups slide the expiry
/// forward, so [`SessionStore::get`] writes to the backend.
#[derive(Clone)]
pub struct SessionStore {
    backend: Arc<dyn SessionBackend>,
    clock: Arc<dyn Clock>,
    ttl_secs: u64,
}

impl SessionStore {
    /// `ttl_secs` is capped at [`MAX_SESSION_TTL_SECONDS`](crate::MAX_SESSION_TTL_SECONDS).
    pub fn new(backend: Arc<dyn SessionBackend>, clock: Arc<dyn Clock>, ttl_secs: u64) -> Self {
        Self {
            backend,
            clock,
            ttl_secs: clamp_ttl(ttl_secs),
        }
    }

    pub fn ttl_secs(&self) -> u64 {
        self.ttl_secs
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Start a session for `username` and return its identifier.
    pub async fn create(&self, username: &str) -> Result<String, SessionError> {
        let session_id = new_session_id()?;
        let expires_at = expiry_after(self.now(), self.ttl_secs);

        let stored_session = StoredSession {
            username: username.to_string(),
            expires_at,
        };

        self.backend
            .insert(&session_id, stored_session, self.ttl_secs)
            .await?;

        tracing::debug!(
            "Session created for {}: {}..., expires: {}",
            username,
            token_prefix(&session_id),
            expires_at
        );
        Ok(session_id)
    }

    /// Look up a session and renew it.
    ///
    /// Returns `None` for unknown or expired identifiers; an expired record is
    /// deleted as part of the lookup. A live record has its expiry moved to
    /// now + TTL before it is returned.
    pub async fn get(&self, session_id: &str) -> Result<Option<Session>, SessionError> {
        let now = self.now();
        let renewed = self
            .backend
            .get_and_renew(session_id, now, self.ttl_secs)
            .await?;

        match renewed {
            Some(stored) => {
                tracing::debug!(
                    "Session validated for {}: {}...",
                    stored.username,
                    token_prefix(session_id)
                );
                Ok(Some(Session::from_stored(session_id, stored)))
            }
            None => {
                tracing::debug!(
                    "Session not found or expired: {}...",
                    token_prefix(session_id)
                );
                Ok(None)
            }
        }
    }

    /// Remove a session. Unknown identifiers are ignored.
    pub async fn delete(&self, session_id: &str) -> Result<(), SessionError> {
        tracing::debug!("Deleting session: {}...", token_prefix(session_id));
        self.backend.remove(session_id).await?;
        Ok(())
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("ttl_secs", &self.ttl_secs)
            .finish_non_exhaustive()
    }
}
