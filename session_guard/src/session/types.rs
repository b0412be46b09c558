use chrono::{DateTime, Utc};

use crate::storage::StoredSession;

/// A live session returned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: String,
    pub username: String,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub(super) fn from_stored(id: &str, stored: StoredSession) -> Self {
        Self {
            id: id.to_string(),
            username: stored.username,
            expires_at: stored.expires_at,
        }
    }
}
