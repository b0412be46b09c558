//! Error types for the session API surface

use http::HeaderMap;
use thiserror::Error;

use crate::session::SessionError;
use crate::utils::UtilError;

/// Errors returned by login, session check and logout.
///
/// Client-facing messages are deliberately generic: a wrong password reads
/// the same as an unknown user, and every CSRF failure reads the same.
#[derive(Error, Debug)]
pub enum CoordinationError {
    /// Credential verification failed
    #[error("Incorrect username or password")]
    InvalidCredentials,

    /// No session cookie, or the session could not be confirmed
    #[error("Not authenticated")]
    Unauthorized,

    /// A session cookie was sent but names no live session. Carries the
    /// `Set-Cookie` headers that clear the stale cookies.
    #[error("Not authenticated")]
    StaleSession(HeaderMap),

    /// CSRF double-submit check failed
    #[error("CSRF token missing or mismatch")]
    Forbidden,

    /// The credential verifier itself failed
    #[error("Credential store error: {0}")]
    CredentialStore(String),

    /// Error from Session operations
    #[error("Session error: {0}")]
    SessionError(SessionError),

    /// Error from utils operations
    #[error("Utils error: {0}")]
    UtilsError(UtilError),
}

impl CoordinationError {
    /// Log the error and return self
    pub fn log(self) -> Self {
        match &self {
            Self::InvalidCredentials => tracing::warn!("Login failed: invalid credentials"),
            Self::Unauthorized => tracing::debug!("Unauthorized access"),
            Self::StaleSession(_) => tracing::debug!("Stale session cookie"),
            Self::Forbidden => tracing::warn!("CSRF verification failed"),
            Self::CredentialStore(msg) => tracing::error!("Credential store error: {}", msg),
            Self::SessionError(err) => tracing::error!("Session error: {}", err),
            Self::UtilsError(err) => tracing::error!("Utils error: {}", err),
        }
        self
    }
}

impl From<SessionError> for CoordinationError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::CsrfToken => Self::Forbidden,
            other => Self::SessionError(other).log(),
        }
    }
}

impl From<UtilError> for CoordinationError {
    fn from(err: UtilError) -> Self {
        Self::UtilsError(err).log()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authentication_failures_share_message() {
        assert_eq!(
            CoordinationError::Unauthorized.to_string(),
            CoordinationError::StaleSession(HeaderMap::new()).to_string()
        );
    }

    #[test]
    fn test_csrf_session_error_becomes_forbidden() {
        let err = CoordinationError::from(SessionError::CsrfToken);
        assert!(matches!(err, CoordinationError::Forbidden));
    }

    #[test]
    fn test_storage_session_error_is_wrapped() {
        let err = CoordinationError::from(SessionError::Storage("down".to_string()));
        assert!(matches!(err, CoordinationError::SessionError(_)));
        assert!(err.to_string().contains("down"));
    }

    #[test]
    fn test_util_error_is_wrapped() {
        let err = CoordinationError::from(UtilError::Crypto("no entropy".to_string()));
        assert!(matches!(err, CoordinationError::UtilsError(_)));
    }
}
