use axum::Router;
use dotenvy::dotenv;
use std::sync::Arc;

use session_guard_axum::{
    InMemoryCredentials, SessionConfig, SessionService, cors_allowed_origins_from_env,
    session_router_with_cors, session_store_from_env,
};

mod protected;
mod server;

use crate::server::{Ports, init_tracing, spawn_http_server, spawn_https_server};

const DEFAULT_DEMO_USERS: &str = "user:password123";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Install default CryptoProvider for rustls to prevent:
    // "no process-level CryptoProvider available -- call CryptoProvider::install_default() before this point"
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| "Failed to install default CryptoProvider")?;

    dotenv().ok();
    init_tracing("demo_login");

    let config = SessionConfig::from_env();
    let store = session_store_from_env(&config).await?;

    let users = std::env::var("DEMO_USERS").unwrap_or_else(|_| DEFAULT_DEMO_USERS.to_string());
    let credentials = InMemoryCredentials::parse(&users);
    if credentials.is_empty() {
        tracing::warn!("DEMO_USERS contains no usable accounts; every login will fail");
    } else {
        tracing::info!("Loaded {} demo account(s)", credentials.len());
    }

    let service = Arc::new(SessionService::new(store, Arc::new(credentials), config));

    let app = Router::new()
        .merge(protected::router(service.clone()))
        .merge(session_router_with_cors(
            service,
            &cors_allowed_origins_from_env(),
        ));

    let ports = Ports::from_env();
    let http_server = spawn_http_server(ports.http, app.clone());

    match server::tls_paths_from_env() {
        Some((cert, key)) => {
            let https_server = spawn_https_server(ports.https, cert, key, app).await?;
            tokio::try_join!(http_server, https_server)?;
        }
        None => {
            tracing::info!("TLS_CERT_PATH/TLS_KEY_PATH not set; serving HTTP only");
            http_server.await?;
        }
    }
    Ok(())
}
