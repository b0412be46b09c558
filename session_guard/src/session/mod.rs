mod errors;
mod main;
mod types;

pub use errors::SessionError;
pub use main::{
    SessionStore, new_csrf_token, new_session_id, verify_csrf_from_headers, verify_csrf_token,
};
pub use types::Session;

pub(crate) use main::{clear_cookie_headers, session_cookie_headers};
