use axum::{
    extract::{FromRef, FromRequestParts},
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use http::request::Parts;
use std::sync::Arc;

use session_guard::{CoordinationError, SessionService};

use crate::error::ApiError;

/// Rejection for the session extractors; renders through [`ApiError`].
#[derive(Debug)]
pub struct SessionRejection(ApiError);

impl From<CoordinationError> for SessionRejection {
    fn from(err: CoordinationError) -> Self {
        Self(ApiError(err))
    }
}

impl IntoResponse for SessionRejection {
    fn into_response(self) -> Response {
        self.0.into_response()
    }
}

/// The user behind the request's session cookie, available as an Axum
/// extractor.
///
/// Extraction looks the session up and therefore renews it. Requests without
/// a live session are rejected with `401 Unauthorized`. Cookies are not
/// re-issued; clients refresh them through `GET /session`.
///
/// # Example
///
/// ```no_run
/// use axum::{routing::get, Router};
/// use session_guard_axum::AuthUser;
///
/// async fn protected_handler(user: AuthUser) -> String {
///     format!("Hello, {}!", user.username)
/// }
/// ```
#[derive(Clone, Debug)]
pub struct AuthUser {
    /// Account name the session was created for
    pub username: String,
    /// Session identifier from the session cookie
    pub session_id: String,
    /// Expiry after the renewal performed by this extraction
    pub expires_at: DateTime<Utc>,
}

impl<S> FromRequestParts<S> for AuthUser
where
    Arc<SessionService>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = SessionRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let service = Arc::<SessionService>::from_ref(state);

        let session = service.authenticate(&parts.headers).await.inspect_err(|_| {
            tracing::debug!("Rejecting request to {}: not authenticated", parts.uri.path());
        })?;

        Ok(AuthUser {
            username: session.username,
            session_id: session.id,
            expires_at: session.expires_at,
        })
    }
}

/// Marker extractor proving the request passed the CSRF double-submit check.
///
/// Put it in front of handlers for state-changing requests. Rejects with
/// `403 Forbidden` without saying which part of the check failed.
#[derive(Clone, Copy, Debug)]
pub struct CsrfProtected;

impl<S> FromRequestParts<S> for CsrfProtected
where
    Arc<SessionService>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = SessionRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let service = Arc::<SessionService>::from_ref(state);
        service.verify_csrf(&parts.headers)?;
        Ok(CsrfProtected)
    }
}
