//! Login, session check and logout built from the session store, the token
//! generator and the CSRF verifier.

mod credentials;
mod errors;
mod service;
mod types;

pub use credentials::{CredentialVerifier, InMemoryCredentials};
pub use errors::CoordinationError;
pub use service::SessionService;
pub use types::{LoginRequest, LogoutResponse, UserInfo};
