use crate::session::errors::SessionError;
use crate::utils::gen_random_string;

/// 256 bits of entropy per token.
const TOKEN_BYTES: usize = 32;

/// Fresh session identifier from the OS random source.
pub fn new_session_id() -> Result<String, SessionError> {
    Ok(gen_random_string(TOKEN_BYTES)?)
}

/// Fresh CSRF token from the OS random source.
pub fn new_csrf_token() -> Result<String, SessionError> {
    Ok(gen_random_string(TOKEN_BYTES)?)
}
