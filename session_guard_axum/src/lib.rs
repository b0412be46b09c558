//! Axum integration for session_guard
//!
//! Mount [`session_router`] (or [`session_router_with_cors`]) to expose the
//! login, logout and session check endpoints, and use [`AuthUser`] and
//! [`CsrfProtected`] as extractors on application routes.

mod config;
mod error;
mod handlers;
mod router;
mod session;

pub use config::{DEFAULT_CORS_ALLOWED_ORIGINS, cors_allowed_origins_from_env};
pub use error::ApiError;
pub use router::{session_router, session_router_no_trace, session_router_with_cors};
pub use session::{AuthUser, CsrfProtected, SessionRejection};

// Re-export the core types needed to build the router state
pub use session_guard::{
    CoordinationError, CredentialVerifier, InMemoryCredentials, SessionConfig, SessionService,
    SessionStore, session_store_from_env,
};
