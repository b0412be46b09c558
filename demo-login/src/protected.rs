use axum::{Json, Router, routing::get};
use serde_json::{Value, json};
use std::sync::Arc;

use session_guard_axum::{AuthUser, CsrfProtected, SessionService};

pub(super) fn router(service: Arc<SessionService>) -> Router {
    Router::new()
        .route("/protected", get(protected).post(protected_post))
        .with_state(service)
}

// Anonymous requests are rejected with 401 by the extractor
async fn protected(user: AuthUser) -> Json<Value> {
    Json(json!({
        "message": format!("Hey {}!", user.username),
        "expires_at": user.expires_at.to_rfc3339(),
    }))
}

// CsrfProtected runs first so a forged request never touches the session
async fn protected_post(_: CsrfProtected, user: AuthUser) -> Json<Value> {
    tracing::info!("State-changing request accepted for {}", user.username);
    Json(json!({ "message": format!("Saved for {}", user.username) }))
}
