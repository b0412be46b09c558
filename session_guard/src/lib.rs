//! session_guard - Server-side login sessions with CSRF protection
//!
//! Sessions live in a [`SessionStore`] with a sliding expiry that is checked
//! lazily on access. State-changing requests are guarded by the
//! double-submit-cookie pattern: a script-readable CSRF cookie must be echoed
//! back in a request header. [`SessionService`] composes both into the
//! login, session check and logout operations.

mod clock;
mod config;
mod coordination;
mod session;
mod storage;
mod utils;

#[cfg(test)]
mod test_utils;

pub use clock::{Clock, MockClock, SystemClock};
pub use config::{
    DEFAULT_CSRF_COOKIE_NAME, DEFAULT_CSRF_HEADER_NAME, DEFAULT_SESSION_COOKIE_NAME,
    DEFAULT_SESSION_TTL_SECONDS, MAX_SESSION_TTL_SECONDS, SessionConfig,
};
pub use coordination::{
    CoordinationError, CredentialVerifier, InMemoryCredentials, LoginRequest, LogoutResponse,
    SessionService, UserInfo,
};
pub use session::{
    Session, SessionError, SessionStore, new_csrf_token, new_session_id, verify_csrf_from_headers,
    verify_csrf_token,
};
pub use storage::{
    InMemorySessionBackend, RedisSessionBackend, SessionBackend, StorageError, StoredSession,
    build_session_backend, session_backend_from_env,
};
pub use utils::{UtilError, get_cookie_from_headers};

/// Build a [`SessionStore`] from the environment: backend chosen by
/// `SESSION_STORE_TYPE`, TTL taken from `config`, system clock.
pub async fn session_store_from_env(config: &SessionConfig) -> Result<SessionStore, StorageError> {
    let backend = session_backend_from_env().await?;
    Ok(SessionStore::new(
        backend,
        std::sync::Arc::new(SystemClock),
        config.ttl_secs,
    ))
}
