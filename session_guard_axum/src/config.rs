//! Environment settings for the HTTP layer

/// Origins trusted for credentialed cross-origin requests.
/// `null` covers pages opened from `file://`.
pub const DEFAULT_CORS_ALLOWED_ORIGINS: &str = "null,http://localhost,http://127.0.0.1";

/// Comma-separated `CORS_ALLOWED_ORIGINS`, or the defaults when unset.
pub fn cors_allowed_origins_from_env() -> Vec<String> {
    parse_origins(std::env::var("CORS_ALLOWED_ORIGINS").ok().as_deref())
}

fn parse_origins(value: Option<&str>) -> Vec<String> {
    value
        .unwrap_or(DEFAULT_CORS_ALLOWED_ORIGINS)
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
