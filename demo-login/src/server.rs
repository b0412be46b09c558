use axum::Router;
use axum_server::tls_rustls::RustlsConfig;
use std::net::SocketAddr;
use tokio::task::JoinHandle;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub(crate) struct Ports {
    pub(crate) http: u16,
    pub(crate) https: u16,
}

impl Ports {
    pub(crate) fn from_env() -> Self {
        Self {
            http: port_from_env("PORT", 3001),
            https: port_from_env("HTTPS_PORT", 3443),
        }
    }
}

fn port_from_env(key: &str, default: u16) -> u16 {
    match std::env::var(key) {
        Ok(value) => value.parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid {}: {:?}, using {}", key, value, default);
            default
        }),
        Err(_) => default,
    }
}

/// Certificate and key paths, when both are configured.
pub(crate) fn tls_paths_from_env() -> Option<(String, String)> {
    let cert = std::env::var("TLS_CERT_PATH").ok()?;
    let key = std::env::var("TLS_KEY_PATH").ok()?;
    Some((cert, key))
}

pub(crate) fn spawn_http_server(port: u16, app: Router) -> JoinHandle<()> {
    tokio::spawn(async move {
        let addr = SocketAddr::from(([0, 0, 0, 0], port));
        tracing::info!("HTTP server listening on {}", addr);
        if let Err(e) = axum_server::bind(addr)
            .serve(app.into_make_service())
            .await
        {
            tracing::error!("HTTP server error: {}", e);
        }
    })
}

pub(crate) async fn spawn_https_server(
    port: u16,
    cert_path: String,
    key_path: String,
    app: Router,
) -> Result<JoinHandle<()>, std::io::Error> {
    let config = RustlsConfig::from_pem_file(cert_path, key_path).await?;

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("HTTPS server listening on {}", addr);
    Ok(tokio::spawn(async move {
        if let Err(e) = axum_server::bind_rustls(addr, config)
            .serve(app.into_make_service())
            .await
        {
            tracing::error!("HTTPS server error: {}", e);
        }
    }))
}

/// Log filter used when `RUST_LOG` is unset: verbose for the session crates
/// in debug builds, `info` otherwise.
fn default_log_filter(app_name: &str) -> String {
    if cfg!(debug_assertions) {
        format!("session_guard=debug,session_guard_axum=debug,tower_http=debug,{app_name}=debug,info")
    } else {
        "info,tower_http=warn".to_string()
    }
}

pub(crate) fn init_tracing(app_name: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_log_filter(app_name)));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();

    tracing::debug!("Tracing initialised; override with RUST_LOG");
}
