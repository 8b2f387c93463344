//! Mapping of domain errors to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use facultrack_core::error::FacultrackError;
use serde_json::json;
use tracing::{error, warn};

/// Error body: `{"error": {"code": "...", "message": "..."}}`.
#[derive(Debug)]
pub struct ApiError(pub FacultrackError);

impl From<FacultrackError> for ApiError {
    fn from(err: FacultrackError) -> Self {
        Self(err)
    }
}

#[must_use]
pub fn status_for(err: &FacultrackError) -> StatusCode {
    match err {
        FacultrackError::Validation { .. } => StatusCode::BAD_REQUEST,
        FacultrackError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
        FacultrackError::Forbidden { .. } => StatusCode::FORBIDDEN,
        FacultrackError::NotFound { .. } => StatusCode::NOT_FOUND,
        FacultrackError::Conflict { .. } => StatusCode::CONFLICT,
        FacultrackError::InvalidTransition { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        FacultrackError::Database(_) | FacultrackError::Crypto(_) | FacultrackError::Internal(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        let message = if status.is_server_error() {
            error!(error = %self.0, "Request failed");
            "internal server error".to_string()
        } else {
            warn!(code = self.0.code(), error = %self.0, "Request rejected");
            self.0.to_string()
        };
        let body = Json(json!({
            "error": {
                "code": self.0.code(),
                "message": message,
            }
        }));
        (status, body).into_response()
    }
}
