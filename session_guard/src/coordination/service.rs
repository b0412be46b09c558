use http::HeaderMap;
use std::sync::Arc;

use crate::config::SessionConfig;
use crate::session::{
    Session, SessionStore, clear_cookie_headers, new_csrf_token, session_cookie_headers,
    verify_csrf_from_headers,
};
use crate::utils::{get_cookie_from_headers, token_prefix};

use super::credentials::CredentialVerifier;
use super::errors::CoordinationError;
use super::types::{LoginRequest, LogoutResponse, UserInfo};

/// Login, session check and logout composed over a [`SessionStore`], a
/// [`CredentialVerifier`] and the CSRF verifier.
///
/// Every successful call returns the `Set-Cookie` headers the response must
/// carry alongside the body.
#[derive(Clone)]
pub struct SessionService {
    store: SessionStore,
    verifier: Arc<dyn CredentialVerifier>,
    config: SessionConfig,
}

impl SessionService {
    /// The store's TTL should match `config.ttl_secs` so that cookie
    /// lifetime and server-side lifetime agree.
    pub fn new(
        store: SessionStore,
        verifier: Arc<dyn CredentialVerifier>,
        config: SessionConfig,
    ) -> Self {
        if store.ttl_secs() != config.ttl_secs {
            tracing::warn!(
                "Session store TTL ({}s) differs from cookie TTL ({}s)",
                store.ttl_secs(),
                config.ttl_secs
            );
        }
        Self {
            store,
            verifier,
            config,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Anonymous -> Authenticated.
    ///
    /// No cookies are produced when verification fails.
    #[tracing::instrument(skip_all, fields(username = %request.username))]
    pub async fn login(
        &self,
        request: &LoginRequest,
    ) -> Result<(HeaderMap, UserInfo), CoordinationError> {
        tracing::debug!("Login attempt");

        let verified = self
            .verifier
            .verify(&request.username, &request.password)
            .await
            .map_err(CoordinationError::log)?;
        if !verified {
            return Err(CoordinationError::InvalidCredentials.log());
        }

        let session_id = self.store.create(&request.username).await?;
        let csrf_token = new_csrf_token()?;
        let headers =
            session_cookie_headers(&self.config, &session_id, &csrf_token, self.store.now())?;

        tracing::info!(
            "Login successful. Session: {}..., CSRF: {}...",
            token_prefix(&session_id),
            token_prefix(&csrf_token)
        );
        Ok((
            headers,
            UserInfo {
                username: request.username.clone(),
                csrf_token,
            },
        ))
    }

    /// Confirm the session named by the request's session cookie, renewing it
    /// and rotating the CSRF token.
    ///
    /// A missing cookie fails straight away without touching the store. A
    /// cookie that names no live session fails with
    /// [`CoordinationError::StaleSession`] carrying cookie-clearing headers.
    #[tracing::instrument(skip_all)]
    pub async fn check_session(
        &self,
        headers: &HeaderMap,
    ) -> Result<(HeaderMap, UserInfo), CoordinationError> {
        let Some(session_id) = get_cookie_from_headers(headers, &self.config.session_cookie_name)
        else {
            tracing::debug!("Session check failed: no session cookie found");
            return Err(CoordinationError::Unauthorized);
        };

        let Some(session) = self.lookup(&session_id).await? else {
            tracing::debug!("Session check failed: invalid or expired session");
            return Err(CoordinationError::StaleSession(clear_cookie_headers(
                &self.config,
            )?));
        };

        let csrf_token = new_csrf_token()?;
        let headers =
            session_cookie_headers(&self.config, &session.id, &csrf_token, self.store.now())?;

        tracing::debug!(
            "Session check successful for {}. New CSRF: {}...",
            session.username,
            token_prefix(&csrf_token)
        );
        Ok((
            headers,
            UserInfo {
                username: session.username,
                csrf_token,
            },
        ))
    }

    /// Authenticated -> Anonymous.
    ///
    /// The CSRF check runs first; when it fails the session is left alone.
    /// A request without a session cookie still succeeds.
    #[tracing::instrument(skip_all)]
    pub async fn logout(
        &self,
        headers: &HeaderMap,
    ) -> Result<(HeaderMap, LogoutResponse), CoordinationError> {
        self.verify_csrf(headers)?;

        if let Some(session_id) = get_cookie_from_headers(headers, &self.config.session_cookie_name)
        {
            self.store.delete(&session_id).await?;
        }

        tracing::info!("Logout successful. Cookies cleared.");
        Ok((
            clear_cookie_headers(&self.config)?,
            LogoutResponse {
                message: "Logout successful".to_string(),
            },
        ))
    }

    /// Resolve the session behind a request without touching cookies.
    ///
    /// The session is renewed as a side effect.
    pub async fn authenticate(&self, headers: &HeaderMap) -> Result<Session, CoordinationError> {
        let session_id = get_cookie_from_headers(headers, &self.config.session_cookie_name)
            .ok_or(CoordinationError::Unauthorized)?;

        self.lookup(&session_id)
            .await?
            .ok_or(CoordinationError::Unauthorized)
    }

    /// Double-submit check of the CSRF cookie against the CSRF header.
    pub fn verify_csrf(&self, headers: &HeaderMap) -> Result<(), CoordinationError> {
        verify_csrf_from_headers(headers, &self.config).map_err(|e| CoordinationError::from(e).log())
    }

    /// Store lookup where a backend failure counts as "not authenticated".
    async fn lookup(&self, session_id: &str) -> Result<Option<Session>, CoordinationError> {
        self.store.get(session_id).await.map_err(|e| {
            tracing::error!("Failed to confirm session: {}", e);
            CoordinationError::Unauthorized
        })
    }
}

impl std::fmt::Debug for SessionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionService")
            .field("store", &self.store)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
