use chrono::{DateTime, Utc};
use http::HeaderMap;

use crate::config::{SessionConfig, expiry_after, ttl_seconds};
use crate::session::errors::SessionError;
use crate::utils::{CookieFlags, header_set_cookie};

/// `Set-Cookie` headers for a live session: the HttpOnly session cookie and
/// the script-readable CSRF cookie, both with `Max-Age` equal to the TTL.
pub(crate) fn session_cookie_headers(
    config: &SessionConfig,
    session_id: &str,
    csrf_token: &str,
    now: DateTime<Utc>,
) -> Result<HeaderMap, SessionError> {
    let max_age = ttl_seconds(config.ttl_secs);
    let expires_at = expiry_after(now, config.ttl_secs);

    let mut headers = HeaderMap::new();
    header_set_cookie(
        &mut headers,
        &config.session_cookie_name,
        session_id,
        expires_at,
        max_age,
        CookieFlags {
            http_only: true,
            secure: config.secure_cookies,
        },
    )?;
    header_set_cookie(
        &mut headers,
        &config.csrf_cookie_name,
        csrf_token,
        expires_at,
        max_age,
        CookieFlags {
            http_only: false,
            secure: config.secure_cookies,
        },
    )?;
    Ok(headers)
}

/// `Set-Cookie` headers that make the browser drop both cookies.
pub(crate) fn clear_cookie_headers(config: &SessionConfig) -> Result<HeaderMap, SessionError> {
    let expired = DateTime::<Utc>::UNIX_EPOCH;

    let mut headers = HeaderMap::new();
    header_set_cookie(
        &mut headers,
        &config.session_cookie_name,
        "",
        expired,
        0,
        CookieFlags {
            http_only: true,
            secure: config.secure_cookies,
        },
    )?;
    header_set_cookie(
        &mut headers,
        &config.csrf_cookie_name,
        "",
        expired,
        0,
        CookieFlags {
            http_only: false,
            secure: config.secure_cookies,
        },
    )?;
    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::header::SET_COOKIE;

    fn set_cookies(headers: &HeaderMap) -> Vec<String> {
        headers
            .get_all(SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_session_cookie_headers() {
        let config = SessionConfig::default();
        let headers = session_cookie_headers(&config, "sid-value", "csrf-value", Utc::now())
            .unwrap();
        let cookies = set_cookies(&headers);
        assert_eq!(cookies.len(), 2);

        let session = &cookies[0];
        assert!(session.starts_with("my_app_session_id=sid-value;"));
        assert!(session.contains("HttpOnly"));
        assert!(session.contains("Secure"));
        assert!(session.contains("SameSite=Lax"));
        assert!(session.contains("Max-Age=3600"));

        let csrf = &cookies[1];
        assert!(csrf.starts_with("my_app_csrf_token=csrf-value;"));
        assert!(!csrf.contains("HttpOnly"));
        assert!(csrf.contains("Secure"));
        assert!(csrf.contains("SameSite=Lax"));
        assert!(csrf.contains("Max-Age=3600"));
    }

    #[test]
    fn test_clear_cookie_headers() {
        let config = SessionConfig::default();
        let cookies = set_cookies(&clear_cookie_headers(&config).unwrap());
        assert_eq!(cookies.len(), 2);

        for cookie in &cookies {
            assert!(cookie.contains("Max-Age=0"));
            assert!(cookie.contains("Expires=Thu, 01 Jan 1970 00:00:00 GMT"));
        }
        assert!(cookies[0].starts_with("my_app_session_id=;"));
        assert!(cookies[1].starts_with("my_app_csrf_token=;"));
    }

    #[test]
    fn test_oversized_ttl_never_yields_negative_max_age() {
        let config = SessionConfig {
            ttl_secs: u64::MAX,
            ..SessionConfig::default()
        };
        let headers = session_cookie_headers(&config, "a", "b", Utc::now()).unwrap();

        let expected = format!("Max-Age={}", crate::config::MAX_SESSION_TTL_SECONDS);
        assert!(set_cookies(&headers).iter().all(|c| c.contains(&expected)));
    }

    #[test]
    fn test_insecure_config_drops_secure_flag() {
        let config = SessionConfig::default().with_secure_cookies(false);
        let headers = session_cookie_headers(&config, "a", "b", Utc::now()).unwrap();
        assert!(set_cookies(&headers).iter().all(|c| !c.contains("Secure")));
    }
}
