//! Router for the session endpoints

use axum::{
    Router,
    routing::{get, post},
};
use http::{HeaderName, HeaderValue, Method, header::CONTENT_TYPE};
use std::sync::Arc;
use tower_http::LatencyUnit;
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

use session_guard::SessionService;

use super::handlers::{check_session, index, login, logout};

/// Session endpoints without HTTP tracing:
/// - `POST /login`
/// - `POST /logout`
/// - `GET /session`
/// - `GET /`
pub fn session_router_no_trace(service: Arc<SessionService>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/session", get(check_session))
        .with_state(service)
}

/// Session endpoints with a `TraceLayer` logging each request and response.
pub fn session_router(service: Arc<SessionService>) -> Router {
    session_router_no_trace(service).layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(
                DefaultOnResponse::new()
                    .level(Level::INFO)
                    .latency_unit(LatencyUnit::Millis),
            ),
    )
}

/// [`session_router`] plus a CORS layer admitting credentialed requests from
/// `allowed_origins`, with the CSRF header allowed.
///
/// Origins that are not valid header values are skipped.
pub fn session_router_with_cors(
    service: Arc<SessionService>,
    allowed_origins: &[String],
) -> Router {
    let csrf_header = HeaderName::from_bytes(service.config().csrf_header_name.as_bytes());
    let mut allowed_headers = vec![CONTENT_TYPE];
    match csrf_header {
        Ok(name) => allowed_headers.push(name),
        Err(e) => tracing::error!("Invalid CSRF header name: {}", e),
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| {
            HeaderValue::from_str(origin)
                .inspect_err(|_| tracing::warn!("Skipping invalid CORS origin: {}", origin))
                .ok()
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(allowed_headers)
        .allow_credentials(true);

    session_router(service).layer(cors)
}
