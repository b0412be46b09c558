use std::env;
use std::sync::Arc;

use super::errors::StorageError;
use super::memory::InMemorySessionBackend;
use super::redis::RedisSessionBackend;
use super::types::SessionBackend;

const DEFAULT_STORE_TYPE: &str = "memory";
const DEFAULT_STORE_URL: &str = "redis://127.0.0.1:6379";

/// Build the session backend named by `SESSION_STORE_TYPE` (`memory` or `redis`).
///
/// The redis backend connects to `SESSION_STORE_URL` and is probed once
/// before being returned.
pub async fn session_backend_from_env() -> Result<Arc<dyn SessionBackend>, StorageError> {
    let store_type =
        env::var("SESSION_STORE_TYPE").unwrap_or_else(|_| DEFAULT_STORE_TYPE.to_string());
    let store_url = env::var("SESSION_STORE_URL").unwrap_or_else(|_| DEFAULT_STORE_URL.to_string());

    build_session_backend(&store_type, &store_url).await
}

pub async fn build_session_backend(
    store_type: &str,
    store_url: &str,
) -> Result<Arc<dyn SessionBackend>, StorageError> {
    tracing::info!("Initializing session store with type: {}", store_type);

    let store: Arc<dyn SessionBackend> = match store_type {
        "memory" => Arc::new(InMemorySessionBackend::new()),
        "redis" => {
            let store = RedisSessionBackend::open(store_url).inspect_err(|e| {
                tracing::error!("Failed to create Redis client: {}", e);
            })?;
            Arc::new(store)
        }
        t => {
            return Err(StorageError::UnsupportedBackend(t.to_string()));
        }
    };

    store.init().await.inspect_err(|e| {
        tracing::error!("Failed to connect to session store: {}", e);
    })?;

    tracing::info!("Connected to session store: type={}", store_type);
    Ok(store)
}
