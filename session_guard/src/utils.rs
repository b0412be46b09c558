use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Utc};
use headers::{Cookie, HeaderMapExt};
use http::header::{HeaderMap, SET_COOKIE};
use ring::rand::SecureRandom;
use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum UtilError {
    #[error("Crypto error: {0}")]
    Crypto(String),

    #[error("Cookie error: {0}")]
    Cookie(String),
}

pub(crate) fn base64url_encode(input: Vec<u8>) -> String {
    URL_SAFE_NO_PAD.encode(input)
}

/// Fill `len` bytes from the OS random source and encode them as base64url.
pub fn gen_random_string(len: usize) -> Result<String, UtilError> {
    let rng = ring::rand::SystemRandom::new();
    let mut buf = vec![0u8; len];
    rng.fill(&mut buf)
        .map_err(|_| UtilError::Crypto("Failed to generate random string".to_string()))?;
    Ok(base64url_encode(buf))
}

/// Attributes of a `Set-Cookie` header written by [`header_set_cookie`].
#[derive(Debug, Clone, Copy)]
pub(crate) struct CookieFlags {
    pub(crate) http_only: bool,
    pub(crate) secure: bool,
}

pub(crate) fn header_set_cookie(
    headers: &mut HeaderMap,
    name: &str,
    value: &str,
    expires_at: DateTime<Utc>,
    max_age: i64,
    flags: CookieFlags,
) -> Result<(), UtilError> {
    let mut cookie = format!(
        "{name}={value}; SameSite=Lax; Path=/; Max-Age={max_age}; Expires={}",
        expires_at.format("%a, %d %b %Y %H:%M:%S GMT")
    );
    if flags.secure {
        cookie.push_str("; Secure");
    }
    if flags.http_only {
        cookie.push_str("; HttpOnly");
    }
    headers.append(
        SET_COOKIE,
        cookie
            .parse()
            .map_err(|_| UtilError::Cookie(format!("Failed to build cookie {name}")))?,
    );
    Ok(())
}

/// Look up a cookie by name across every `Cookie` header of the request.
pub fn get_cookie_from_headers(headers: &HeaderMap, name: &str) -> Option<String> {
    let cookies = headers.typed_get::<Cookie>()?;
    cookies
        .get(name)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Shortened token for log lines.
pub(crate) fn token_prefix(token: &str) -> &str {
    token.get(..8).unwrap_or(token)
}
