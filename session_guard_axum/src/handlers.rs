use axum::{
    Json,
    extract::State,
    http::HeaderMap,
    response::IntoResponse,
};
use serde_json::{Value, json};
use std::sync::Arc;

use session_guard::{LoginRequest, LogoutResponse, SessionService, UserInfo};

use crate::error::ApiError;

/// `POST /login`
pub(crate) async fn login(
    State(service): State<Arc<SessionService>>,
    Json(request): Json<LoginRequest>,
) -> Result<(HeaderMap, Json<UserInfo>), ApiError> {
    let (headers, info) = service.login(&request).await?;
    Ok((headers, Json(info)))
}

/// `POST /logout`, guarded by the CSRF double-submit check.
pub(crate) async fn logout(
    State(service): State<Arc<SessionService>>,
    headers: HeaderMap,
) -> Result<(HeaderMap, Json<LogoutResponse>), ApiError> {
    let (cookies, response) = service.logout(&headers).await?;
    Ok((cookies, Json(response)))
}

/// `GET /session`: renews the session and rotates the CSRF token.
pub(crate) async fn check_session(
    State(service): State<Arc<SessionService>>,
    headers: HeaderMap,
) -> Result<(HeaderMap, Json<UserInfo>), ApiError> {
    let (cookies, info) = service.check_session(&headers).await?;
    Ok((cookies, Json(info)))
}

/// `GET /`
pub(crate) async fn index() -> impl IntoResponse {
    Json::<Value>(json!({ "message": "Secure Login Backend is running!" }))
}
