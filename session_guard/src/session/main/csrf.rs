use http::HeaderMap;
use subtle::ConstantTimeEq;

use crate::config::SessionConfig;
use crate::session::errors::SessionError;
use crate::utils::get_cookie_from_headers;

/// Double-submit-cookie check.
///
/// Passes only when both tokens are present and byte-equal. Every failure
/// returns the same [`SessionError::CsrfToken`] so callers cannot tell a
/// missing cookie from a missing header or a wrong value.
pub fn verify_csrf_token(
    cookie_token: Option<&str>,
    header_token: Option<&str>,
) -> Result<(), SessionError> {
    let (Some(cookie_token), Some(header_token)) = (cookie_token, header_token) else {
        tracing::warn!("CSRF check failed: token missing from cookie or header");
        return Err(SessionError::CsrfToken);
    };

    if cookie_token.is_empty() || header_token.is_empty() {
        tracing::warn!("CSRF check failed: empty token");
        return Err(SessionError::CsrfToken);
    }

    if !bool::from(cookie_token.as_bytes().ct_eq(header_token.as_bytes())) {
        tracing::warn!("CSRF check failed: token mismatch");
        return Err(SessionError::CsrfToken);
    }

    tracing::trace!("CSRF token verified");
    Ok(())
}

/// Run [`verify_csrf_token`] on the CSRF cookie and CSRF header of a request.
pub fn verify_csrf_from_headers(
    headers: &HeaderMap,
    config: &SessionConfig,
) -> Result<(), SessionError> {
    let cookie_token = get_cookie_from_headers(headers, &config.csrf_cookie_name);
    let header_token = headers
        .get(config.csrf_header_name.as_str())
        .and_then(|h| h.to_str().ok());

    verify_csrf_token(cookie_token.as_deref(), header_token)
}
