mod config;
mod errors;
mod memory;
mod redis;
mod types;

pub use config::{build_session_backend, session_backend_from_env};
pub use errors::StorageError;
pub use memory::InMemorySessionBackend;
pub use redis::RedisSessionBackend;
pub use types::{SessionBackend, StoredSession};
