mod cookie;
mod csrf;
mod store;
mod token;

pub use csrf::{verify_csrf_from_headers, verify_csrf_token};
pub use store::SessionStore;
pub use token::{new_csrf_token, new_session_id};

pub(crate) use cookie::{clear_cookie_headers, session_cookie_headers};
