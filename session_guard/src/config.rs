//! Cookie, header and lifetime settings shared by the store and the coordinator

use chrono::{DateTime, TimeDelta, Utc};
use std::env;

pub const DEFAULT_SESSION_COOKIE_NAME: &str = "my_app_session_id";
pub const DEFAULT_CSRF_COOKIE_NAME: &str = "my_app_csrf_token";
pub const DEFAULT_CSRF_HEADER_NAME: &str = "X-CSRF-Token";
/// One hour.
pub const DEFAULT_SESSION_TTL_SECONDS: u64 = 3600;
/// 400 days, the longest cookie lifetime browsers honour.
pub const MAX_SESSION_TTL_SECONDS: u64 = 400 * 24 * 3600;

/// Settings for session and CSRF cookies.
///
/// Both cookies share `ttl_secs` as their `Max-Age`; the same value is the
/// sliding lifetime of a server-side session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Name of the script-inaccessible session cookie
    pub session_cookie_name: String,
    /// Name of the script-readable CSRF cookie
    pub csrf_cookie_name: String,
    /// Request header that must echo the CSRF cookie on state-changing requests
    pub csrf_header_name: String,
    /// Session lifetime in seconds, renewed on every successful lookup
    pub ttl_secs: u64,
    /// Whether cookies carry the `Secure` attribute
    pub secure_cookies: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            session_cookie_name: DEFAULT_SESSION_COOKIE_NAME.to_string(),
            csrf_cookie_name: DEFAULT_CSRF_COOKIE_NAME.to_string(),
            csrf_header_name: DEFAULT_CSRF_HEADER_NAME.to_string(),
            ttl_secs: DEFAULT_SESSION_TTL_SECONDS,
            secure_cookies: true,
        }
    }
}

impl SessionConfig {
    /// Read settings from the environment, falling back to defaults for
    /// unset or unparsable values.
    ///
    /// * `SESSION_COOKIE_NAME`
    /// * `CSRF_COOKIE_NAME`
    /// * `CSRF_HEADER_NAME`
    /// * `SESSION_TTL_SECONDS`
    /// * `SESSION_COOKIE_SECURE`
    pub fn from_env() -> Self {
        Self {
            session_cookie_name: parse_name(
                env::var("SESSION_COOKIE_NAME").ok(),
                DEFAULT_SESSION_COOKIE_NAME,
            ),
            csrf_cookie_name: parse_name(
                env::var("CSRF_COOKIE_NAME").ok(),
                DEFAULT_CSRF_COOKIE_NAME,
            ),
            csrf_header_name: parse_name(
                env::var("CSRF_HEADER_NAME").ok(),
                DEFAULT_CSRF_HEADER_NAME,
            ),
            ttl_secs: parse_ttl(env::var("SESSION_TTL_SECONDS").ok()),
            secure_cookies: parse_secure(env::var("SESSION_COOKIE_SECURE").ok()),
        }
    }

    /// Values above [`MAX_SESSION_TTL_SECONDS`] are capped.
    pub fn with_ttl_secs(mut self, ttl_secs: u64) -> Self {
        self.ttl_secs = clamp_ttl(ttl_secs);
        self
    }

    pub fn with_secure_cookies(mut self, secure: bool) -> Self {
        self.secure_cookies = secure;
        self
    }
}

fn parse_name(value: Option<String>, default: &str) -> String {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_ttl(value: Option<String>) -> u64 {
    value
        .and_then(|s| s.trim().parse().ok())
        .filter(|ttl| *ttl > 0)
        .map(clamp_ttl)
        .unwrap_or(DEFAULT_SESSION_TTL_SECONDS)
}

pub(crate) fn clamp_ttl(ttl_secs: u64) -> u64 {
    if ttl_secs > MAX_SESSION_TTL_SECONDS {
        tracing::warn!(
            "Session TTL {}s exceeds the maximum, using {}s",
            ttl_secs,
            MAX_SESSION_TTL_SECONDS
        );
        MAX_SESSION_TTL_SECONDS
    } else {
        ttl_secs
    }
}

/// TTL as signed seconds, for `Max-Age` and date arithmetic.
pub(crate) fn ttl_seconds(ttl_secs: u64) -> i64 {
    i64::try_from(ttl_secs.min(MAX_SESSION_TTL_SECONDS)).unwrap_or(i64::MAX)
}

/// `now + ttl_secs`, saturating at the latest representable instant.
pub(crate) fn expiry_after(now: DateTime<Utc>, ttl_secs: u64) -> DateTime<Utc> {
    TimeDelta::try_seconds(ttl_seconds(ttl_secs))
        .and_then(|ttl| now.checked_add_signed(ttl))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

fn parse_secure(value: Option<String>) -> bool {
    value
        .map(|val| val.trim().to_lowercase() != "false")
        .unwrap_or(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    /// Set an environment variable for the duration of `test`, restoring the
    /// original value afterward.
    fn with_env_var<F, R>(key: &str, value: Option<&str>, test: F) -> R
    where
        F: FnOnce() -> R,
    {
        let original = env::var(key).ok();

        match value {
            Some(val) => unsafe { env::set_var(key, val) },
            None => unsafe { env::remove_var(key) },
        }

        let result = test();

        match original {
            Some(val) => unsafe { env::set_var(key, val) },
            None => unsafe { env::remove_var(key) },
        }

        result
    }

    #[test]
    fn test_default_config() {
        let config = SessionConfig::default();
        assert_eq!(config.session_cookie_name, "my_app_session_id");
        assert_eq!(config.csrf_cookie_name, "my_app_csrf_token");
        assert_eq!(config.csrf_header_name, "X-CSRF-Token");
        assert_eq!(config.ttl_secs, 3600);
        assert!(config.secure_cookies);
    }

    #[test]
    fn test_parse_ttl() {
        assert_eq!(parse_ttl(None), 3600);
        assert_eq!(parse_ttl(Some("1800".to_string())), 1800);
        assert_eq!(parse_ttl(Some("invalid".to_string())), 3600);
        assert_eq!(parse_ttl(Some("0".to_string())), 3600);
        assert_eq!(parse_ttl(Some("-5".to_string())), 3600);
    }

    #[test]
    fn test_parse_ttl_caps_oversized_values() {
        assert_eq!(
            parse_ttl(Some("100000000000000000".to_string())),
            MAX_SESSION_TTL_SECONDS
        );
        assert_eq!(
            parse_ttl(Some(u64::MAX.to_string())),
            MAX_SESSION_TTL_SECONDS
        );
    }

    #[test]
    fn test_expiry_after_never_wraps() {
        let now = Utc::now();

        // Given a TTL that does not fit in i64
        let expires_at = expiry_after(now, u64::MAX);

        // Then the expiry is capped, not negative
        assert_eq!(
            expires_at,
            now + TimeDelta::seconds(MAX_SESSION_TTL_SECONDS as i64)
        );
        assert_eq!(ttl_seconds(u64::MAX), MAX_SESSION_TTL_SECONDS as i64);
    }

    #[test]
    fn test_expiry_after_saturates_near_max_date() {
        let expires_at = expiry_after(DateTime::<Utc>::MAX_UTC, 60);
        assert_eq!(expires_at, DateTime::<Utc>::MAX_UTC);
    }

    #[test]
    fn test_parse_secure() {
        assert!(parse_secure(None));
        assert!(parse_secure(Some("true".to_string())));
        assert!(parse_secure(Some("anything".to_string())));
        assert!(!parse_secure(Some("false".to_string())));
        assert!(!parse_secure(Some("FALSE".to_string())));
    }

    #[test]
    fn test_parse_name() {
        assert_eq!(parse_name(None, "fallback"), "fallback");
        assert_eq!(parse_name(Some("  ".to_string()), "fallback"), "fallback");
        assert_eq!(parse_name(Some("custom".to_string()), "fallback"), "custom");
    }

    #[test]
    #[serial]
    fn test_from_env_reads_ttl_and_cookie_name() {
        with_env_var("SESSION_TTL_SECONDS", Some("120"), || {
            with_env_var("SESSION_COOKIE_NAME", Some("sid"), || {
                let config = SessionConfig::from_env();
                assert_eq!(config.ttl_secs, 120);
                assert_eq!(config.session_cookie_name, "sid");
            })
        });
    }

    #[test]
    #[serial]
    fn test_from_env_insecure_cookies() {
        with_env_var("SESSION_COOKIE_SECURE", Some("false"), || {
            assert!(!SessionConfig::from_env().secure_cookies);
        });
    }

    #[test]
    fn test_builders() {
        let config = SessionConfig::default()
            .with_ttl_secs(10)
            .with_secure_cookies(false);
        assert_eq!(config.ttl_secs, 10);
        assert!(!config.secure_cookies);

        let capped = SessionConfig::default().with_ttl_secs(u64::MAX);
        assert_eq!(capped.ttl_secs, MAX_SESSION_TTL_SECONDS);
    }

    #[test]
    #[serial]
    fn test_from_env_caps_huge_ttl() {
        with_env_var("SESSION_TTL_SECONDS", Some("100000000000000000"), || {
            assert_eq!(SessionConfig::from_env().ttl_secs, MAX_SESSION_TTL_SECONDS);
        });
    }
}
