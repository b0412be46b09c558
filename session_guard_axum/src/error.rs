use axum::{
    Json,
    response::{IntoResponse, Response},
};
use http::{HeaderValue, StatusCode, header::WWW_AUTHENTICATE};
use serde_json::json;

use session_guard::CoordinationError;

/// HTTP rendering of a [`CoordinationError`].
///
/// Bodies are `{"detail": "..."}` with the error's generic message. Internal
/// failures are logged but not described to the client.
#[derive(Debug)]
pub struct ApiError(pub CoordinationError);

impl From<CoordinationError> for ApiError {
    fn from(err: CoordinationError) -> Self {
        Self(err)
    }
}

pub(crate) fn status_code(err: &CoordinationError) -> StatusCode {
    match err {
        CoordinationError::InvalidCredentials
        | CoordinationError::Unauthorized
        | CoordinationError::StaleSession(_) => StatusCode::UNAUTHORIZED,
        CoordinationError::Forbidden => StatusCode::FORBIDDEN,
        CoordinationError::CredentialStore(_)
        | CoordinationError::SessionError(_)
        | CoordinationError::UtilsError(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_code(&self.0);
        let detail = if status == StatusCode::INTERNAL_SERVER_ERROR {
            "Internal server error".to_string()
        } else {
            self.0.to_string()
        };
        let body = Json(json!({ "detail": detail }));

        match self.0 {
            CoordinationError::StaleSession(headers) => (status, headers, body).into_response(),
            CoordinationError::InvalidCredentials => {
                let mut response = (status, body).into_response();
                response
                    .headers_mut()
                    .insert(WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
                response
            }
            _ => (status, body).into_response(),
        }
    }
}
