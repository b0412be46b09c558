use async_trait::async_trait;
use std::collections::HashMap;
use subtle::ConstantTimeEq;

use super::errors::CoordinationError;

/// External credential check consumed by login.
///
/// Implementations own the credential records and the hashing strategy; the
/// session layer only sees pass or fail. An `Err` means the verifier could not
/// reach a decision, not that the credentials were wrong.
#[async_trait]
pub trait CredentialVerifier: Send + Sync + 'static {
    async fn verify(&self, username: &str, password: &str) -> Result<bool, CoordinationError>;
}

/// Fixed username/password table held in memory, for demos and tests.
#[derive(Default, Clone)]
pub struct InMemoryCredentials {
    users: HashMap<String, String>,
}

impl InMemoryCredentials {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.users.insert(username.into(), password.into());
        self
    }

    /// Parse `name:password` pairs separated by commas. Entries without a
    /// colon or with an empty name are skipped.
    pub fn parse(entries: &str) -> Self {
        let users = entries
            .split(',')
            .filter_map(|entry| {
                let (name, password) = entry.trim().split_once(':')?;
                let name = name.trim();
                (!name.is_empty()).then(|| (name.to_string(), password.to_string()))
            })
            .collect();
        Self { users }
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl std::fmt::Debug for InMemoryCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryCredentials")
            .field("users", &self.users.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[async_trait]
impl CredentialVerifier for InMemoryCredentials {
    async fn verify(&self, username: &str, password: &str) -> Result<bool, CoordinationError> {
        // Unknown users still pay for a comparison
        let (expected, known) = match self.users.get(username) {
            Some(expected) => (expected.as_str(), true),
            None => ("", false),
        };
        let matches: bool = expected.as_bytes().ct_eq(password.as_bytes()).into();
        Ok(known && matches)
    }
}
